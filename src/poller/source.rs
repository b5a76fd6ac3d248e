use std::future::Future;

use crate::status::RawRtkStatus;

/// Something that can be asked, on demand, for a current raw status
/// snapshot. Timeout enforcement belongs to the implementation; the poll
/// loop waits indefinitely for the future to resolve.
pub trait StatusSource: Send + 'static {
    type Error: std::error::Error + Send + 'static;

    fn get_status(
        &mut self,
    ) -> impl Future<Output = Result<RawRtkStatus, Self::Error>> + Send;
}
