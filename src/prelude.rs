//! Bookstall prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{AuthError, AuthSession, CredentialService, PasswordHash, TokenError, login, register},
    books::{Book, Rating},
    cart::{Cart, CartError, CartItem},
    catalog::{CATEGORY_ALL, FilterSpec, QueryResults, SortKey, SortOrder, categories, query},
    orders::{CheckoutError, Order, OrderStatus, PaymentDetails, checkout, orders},
    session::{Session, SessionId},
    store::{JsonStore, StoreError},
    users::{NewUser, ShippingAddress, User},
};
