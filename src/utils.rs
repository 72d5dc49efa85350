/// Polls `ready` until it reports `true` or `budget` polls have been spent.
///
/// This is a plain countdown rather than a time-based deadline: the budgets
/// come from the clock generator's characterisation and must hold no matter
/// which clock the core is currently running from.
#[inline]
pub(crate) fn blocking_wait_countdown<F>(mut ready: F, budget: u32) -> Result<(), ()>
where
    F: FnMut() -> bool,
{
    let mut remaining = budget;
    while remaining > 0 {
        if ready() {
            return Ok(());
        }
        remaining -= 1;
    }
    Err(())
}

/// Polls `busy` until it reports `false` or `budget` polls have been spent.
#[inline]
pub(crate) fn blocking_wait_clear<F>(mut busy: F, budget: u32) -> Result<(), ()>
where
    F: FnMut() -> bool,
{
    blocking_wait_countdown(|| !busy(), budget)
}
