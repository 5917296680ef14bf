use tracing::{error, info, instrument};

use crate::tasks::{
    BlockMissed, BridgeNotRunning, ChainStuck, DasSamplingHeight, LowPeers, NewProposal,
    NodeIsSynching, Pluggable, PositionChanged, Task, TaskContext,
};

/// Build the task list for the detected role.
///
/// Role-independent tasks come first, followed by the tasks the backend
/// always carries. Each one is filtered by its `is_pluggable` predicate and
/// by `tasks.disabled`; a task whose construction fails is left out.
#[instrument(skip(ctx), fields(role = %ctx.role))]
pub async fn build_tasks(ctx: &TaskContext) -> Vec<Task> {
    let mut tasks = Vec::new();

    plug::<ChainStuck>(ctx, &mut tasks).await;
    plug::<LowPeers>(ctx, &mut tasks).await;

    if ctx.role.is_das() {
        plug::<DasSamplingHeight>(ctx, &mut tasks).await;
        plug::<NodeIsSynching>(ctx, &mut tasks).await;
    } else {
        plug::<BlockMissed>(ctx, &mut tasks).await;
        plug::<PositionChanged>(ctx, &mut tasks).await;
        plug::<NewProposal>(ctx, &mut tasks).await;
        plug::<BridgeNotRunning>(ctx, &mut tasks).await;
    }

    info!("{} tasks registered for {} node", tasks.len(), ctx.role);
    tasks
}

async fn plug<T: Pluggable>(ctx: &TaskContext, tasks: &mut Vec<Task>) {
    if !T::is_pluggable(ctx.role) {
        return;
    }
    if ctx.config.tasks.is_disabled(T::NAME) {
        info!("{} disabled by configuration", T::NAME);
        return;
    }

    match T::build(ctx).await {
        Ok(task) => {
            info!(
                "✓ Registered {} (check every {}s, notify every {}s)",
                task.name(),
                task.check_interval().num_seconds(),
                task.notify_interval().num_seconds()
            );
            tasks.push(task);
        }
        Err(e) => error!("✗ Failed to build {}: {}", T::NAME, e),
    }
}
