mod app;
mod fluentd;
mod prelude;
mod stdin;
mod tcp;
#[cfg(unix)]
mod unix;

pub use self::app::*;
pub use self::fluentd::*;
pub(crate) use self::prelude::{error_stage, error_type, io_error_code};
pub use self::stdin::*;
pub use self::tcp::*;
#[cfg(unix)]
pub use self::unix::*;

pub trait InternalEvent: Sized {
    fn emit(self);
}

pub fn emit(event: impl InternalEvent) {
    event.emit();
}

#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::internal_events::emit($event)
    };
}
