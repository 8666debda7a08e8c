//! services/console/src/app/state.rs
//!
//! Defines the console's shared services and the state the view renders.

use std::sync::Arc;

use catalog_core::domain::{Product, RequestContext};
use catalog_core::form::ProductEditor;
use catalog_core::modal::DialogOptions;
use catalog_core::ports::{AuthService, ProductRepository, TokenStore};

//=========================================================================================
// Services (created once at startup)
//=========================================================================================

/// The port implementations the console calls into.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductRepository>,
    pub tokens: Arc<dyn TokenStore>,
}

//=========================================================================================
// ConsoleState (everything the view depends on)
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A one-off message shown above the next rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub session: SessionStatus,
    pub products: Vec<Product>,
    pub editor: ProductEditor,
    pub notices: Vec<Notice>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            session: SessionStatus::Unauthenticated,
            products: Vec::new(),
            editor: ProductEditor::new(DialogOptions::default()),
            notices: Vec::new(),
        }
    }
}

impl ConsoleState {
    pub fn is_authenticated(&self) -> bool {
        self.session == SessionStatus::Authenticated
    }

    pub fn push_info(&mut self, text: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }

    /// Hands the pending notices to the caller, leaving none behind.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

//=========================================================================================
// Console (services + state + the request context carrying the token)
//=========================================================================================

pub struct Console {
    pub(crate) services: Services,
    pub(crate) ctx: RequestContext,
    pub(crate) state: ConsoleState,
}

impl Console {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            ctx: RequestContext::anonymous(),
            state: ConsoleState::default(),
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConsoleState {
        &mut self.state
    }

    /// The context attached to every outbound call.
    pub fn request_context(&self) -> &RequestContext {
        &self.ctx
    }
}
