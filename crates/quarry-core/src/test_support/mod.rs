pub mod entity;
pub mod executor;
pub mod observer;

pub use entity::{Order, Tag, User, registry};
pub use executor::{Blob, StubExecutor};
pub use observer::{CountingCache, PanickingObserver, RecordingObserver};

use crate::{
    dispatch::{Connection, ConnectionBuilder},
    obs::QueryObserver,
};
use std::sync::Arc;

/// Connection over `executor` with the fixture registry and `observer`.
pub fn connection(
    executor: StubExecutor,
    observer: Arc<dyn QueryObserver>,
) -> Connection<StubExecutor> {
    ConnectionBuilder::new()
        .registry(registry())
        .observer(observer)
        .build(executor)
}
