// ============================================================================
// VIEWMODELS - Estado + lógica de UI de la barra de navegación
// ============================================================================

pub mod session_tracker;
pub mod currency_sync;
pub mod navigation_viewmodel;

pub use session_tracker::SessionTracker;
pub use currency_sync::CurrencySync;
pub use navigation_viewmodel::NavigationViewModel;

use std::rc::Rc;

use crate::services::{AuthClient, Clock, ProfileStore, Router, Scheduler, Spawner};

/// Colaboradores externos inyectados en los viewmodels
#[derive(Clone)]
pub struct NavServices {
    pub auth: Rc<dyn AuthClient>,
    pub store: Rc<dyn ProfileStore>,
    pub router: Rc<dyn Router>,
    pub scheduler: Rc<dyn Scheduler>,
    pub spawner: Spawner,
    pub clock: Clock,
}

impl NavServices {
    pub fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + 'static,
    {
        (self.spawner)(Box::pin(future));
    }
}
