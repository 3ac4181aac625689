//! Wires the registration form to the user list: a successful registration
//! reloads the list from page one.

use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::{
    form::{FormController, SubmitOutcome},
    user_list::{LoadOutcome, UserListController},
    RegistryApi,
};

pub struct RegistrationPage {
    api: Arc<dyn RegistryApi>,
    form: FormController,
    users: UserListController,
    registered: Option<oneshot::Receiver<()>>,
}

impl RegistrationPage {
    pub fn new(api: Arc<dyn RegistryApi>) -> Self {
        Self::with_user_list(api, UserListController::new())
    }

    pub fn with_user_list(api: Arc<dyn RegistryApi>, users: UserListController) -> Self {
        let (notifier, registered) = oneshot::channel();
        Self {
            api,
            form: FormController::new().with_registration_notifier(notifier),
            users,
            registered: Some(registered),
        }
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn users(&self) -> &UserListController {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserListController {
        &mut self.users
    }

    pub async fn mount(&mut self) -> LoadOutcome {
        self.users.initial_load(self.api.as_ref()).await
    }

    pub async fn show_more(&mut self) -> LoadOutcome {
        self.users.show_more(self.api.as_ref()).await
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.form.submit(self.api.as_ref()).await;
        self.dispatch_registration().await;
        outcome
    }

    async fn dispatch_registration(&mut self) {
        let Some(registered) = self.registered.as_mut() else {
            return;
        };
        match registered.try_recv() {
            Ok(()) => {
                self.registered = None;
                info!("user registered; reloading user list");
                let outcome = self.users.reload(self.api.as_ref()).await;
                debug!(?outcome, "post-registration reload finished");
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => self.registered = None,
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
