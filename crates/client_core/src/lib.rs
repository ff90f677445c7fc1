//! Client side of a counting station: bounded keypad fields, page state
//! and the counting server's HTTP contract.

pub mod binding;
pub mod counter_client;
pub mod error;
pub mod keypad;
pub mod notify;
pub mod page;
pub mod settings;
pub mod store;

pub use binding::{DisplaySurface, FieldHandle, FieldOutcome, FieldSpec, Keypad};
pub use counter_client::{CounterApi, CounterClient};
pub use error::{CounterError, KeypadError, StoreError};
pub use keypad::{BoundedIntegerField, Bounds};
pub use notify::{Notice, Notifier, QueueNotifier, ToastKind, TracingNotifier};
pub use page::{ConnectionEvent, ConnectionState, PageContext};
pub use settings::{load_settings, Settings};
pub use store::{FileStore, KeyValueStore, MemoryStore};
