//! Poll loop: check until ready, or until the policy says stop.

use std::future::Future;
use std::time::{Duration, Instant};

use super::policy::{PollDecision, PollPolicy};

/// Runs `check` until it yields `Some`, the policy gives up (`Ok(None)`) or the
/// check fails. Crossing the soft timeout reports once, naming `label`, to the
/// log and to stderr; a persistent policy keeps polling afterwards.
pub async fn poll_until<T, E, F, Fut>(
    policy: &PollPolicy,
    label: &str,
    check: F,
) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    poll_with_notice(policy, label, check, |notice| {
        tracing::warn!("{}", notice);
        eprintln!("{}", notice);
    })
    .await
}

/// Soft-timeout message for the element or event named `label`.
fn soft_timeout_notice(label: &str, elapsed: Duration) -> String {
    format!(
        "timed out while waiting for {} ({:.0}s); still polling",
        label,
        elapsed.as_secs_f64()
    )
}

async fn poll_with_notice<T, E, F, Fut, N>(
    policy: &PollPolicy,
    label: &str,
    mut check: F,
    mut notify: N,
) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    N: FnMut(&str),
{
    let started = Instant::now();
    let mut attempt = 1u32;
    let mut warned = false;
    loop {
        if let Some(value) = check().await? {
            if warned {
                tracing::info!(
                    "{} ready after {:.1}s",
                    label,
                    started.elapsed().as_secs_f64()
                );
            }
            return Ok(Some(value));
        }

        let elapsed = started.elapsed();
        match policy.decide(attempt, elapsed) {
            PollDecision::GiveUp => return Ok(None),
            PollDecision::RetryAfter(delay) => {
                if !warned && policy.past_soft_timeout(elapsed) {
                    notify(&soft_timeout_notice(label, elapsed));
                    warned = true;
                }
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
