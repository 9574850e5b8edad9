//! Registration form model and the client it submits through.
//!
//! The form keeps an immutable [`RegisterFields`] snapshot, derives its errors
//! with the pure [`validate`], and on submit calls
//! [`UserApi::create_user`] once before navigating to `/`.

pub mod client;
pub mod form;

pub use client::{ClientError, HttpUserApi, Navigator, UserApi};
pub use form::{
    validate, Field, FieldErrors, FieldState, FormState, RegisterFields, RegisterForm,
    SubmitError,
};
