//! Follow a launched operation until it reaches a terminal state.

use std::time::Duration;

use rfops_client::CommandClient;
use rfops_core::Operation;
use rfops_tracker::{LifecycleController, PollScheduler};

/// Store re-read cadence for the display loop; independent of the poll
/// scheduler's own interval.
const REFRESH: Duration = Duration::from_millis(500);

/// Run the scheduler and watch one record until it turns terminal,
/// printing each changed status line. Ctrl-C sends a stop command; the
/// cancelled record comes back through the normal commit path.
pub async fn follow<O, C, R>(
    controller: &LifecycleController<O, C>,
    scheduler: &mut PollScheduler<O, C>,
    id: &str,
    quiet: bool,
    render: R,
) -> Result<O, String>
where
    O: Operation,
    C: CommandClient<O>,
    R: Fn(&O) -> String,
{
    scheduler.start();
    let mut last_line = String::new();
    let outcome = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if !quiet {
                    eprintln!("stopping {} '{id}'...", O::KIND);
                }
                match controller.terminate(id).await {
                    Ok(stopped) => break Ok(stopped),
                    // Not stoppable any more (or unreachable); keep
                    // following, the next refresh will settle it.
                    Err(err) => eprintln!("stop failed: {err}"),
                }
            }
            _ = tokio::time::sleep(REFRESH) => {
                let Some(record) = controller.store().get(id) else {
                    break Err(format!("{} '{id}' disappeared from the store", O::KIND));
                };
                let line = render(&record);
                if !quiet && line != last_line {
                    eprintln!("{line}");
                    last_line = line;
                }
                if record.is_terminal() {
                    break Ok(record);
                }
            }
        }
    };
    scheduler.stop();
    outcome
}
