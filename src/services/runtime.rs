// ============================================================================
// RUNTIME - Spawner, timers y reloj inyectables
// ============================================================================
// En el navegador se usan spawn_local + gloo_timers + chrono.
// Los tests nativos inyectan un LocalPool y un scheduler manual.
// ============================================================================

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use std::rc::Rc;

/// Lanza un future en el executor de un solo hilo
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Segundos unix actuales
pub type Clock = Rc<dyn Fn() -> i64>;

/// Handle de un timer pendiente: al hacer drop se cancela
pub trait TimerHandle {}

impl TimerHandle for Timeout {}

/// Programa callbacks diferidos
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle>;
}

/// Scheduler del navegador basado en `setTimeout`
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        Box::new(Timeout::new(delay_ms, callback))
    }
}

pub fn browser_spawner() -> Spawner {
    Rc::new(|fut| wasm_bindgen_futures::spawn_local(fut))
}

pub fn system_clock() -> Clock {
    Rc::new(|| chrono::Utc::now().timestamp())
}
