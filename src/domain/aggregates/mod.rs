//! Aggregates module
pub mod cart;
pub mod contact;
pub mod order;
pub mod product;
pub mod review;
pub mod testimonial;
pub mod user;

pub use cart::{Cart, CartError, CartItem, SelectedOptions};
pub use contact::{Contact, ContactStatus, NewContact};
pub use order::{NewOrder, Order, OrderError, OrderLine, OrderStatus, ShippingAddress};
pub use product::{
    Availability, Color, Dimensions, Discount, DiscountKind, NewProduct, Product, ProductPatch,
    ProductSummary,
};
pub use review::{RatingSummary, Review, ReviewSubmission};
pub use testimonial::{NormalizedTestimonial, Testimonial, TestimonialSubmission};
pub use user::{Address, AddressInput, Role, User, UserRef};
