pub mod domain;
pub mod form;
pub mod modal;
pub mod ports;

pub use domain::{
    AuthToken, Credentials, Product, ProductDraft, ProductPayload, RequestContext, MAX_IMAGES,
};
pub use form::{FieldInput, FormError, PendingAction, ProductEditor, ProductField};
pub use modal::{Dialog, DialogOptions, ModalController, ModalMode};
pub use ports::{AuthService, PortError, PortResult, ProductRepository, TokenStore};
