//! Run one evaluation window immediately.

use clap::Args;

use watchtower_core::error::AppError;
use watchtower_entity::rule::Schedule;

/// Arguments for the evaluate command
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Which window to run: daily or weekly
    #[arg(short, long, default_value = "daily")]
    pub schedule: String,
}

/// Execute the evaluate command
pub async fn execute(args: &EvaluateArgs, env: &str) -> Result<(), AppError> {
    let schedule: Schedule = args.schedule.parse()?;
    if schedule == Schedule::Immediate {
        return Err(AppError::validation(
            "Evaluate accepts 'daily' or 'weekly'",
        ));
    }

    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let state = watchtower_api::AppState::build(config, pool)?;

    println!("Running {schedule} evaluation...");
    let summary = state.evaluation_job.run(schedule).await?;

    println!("  Rules processed:     {}", summary.rules_processed);
    println!("  Alerts created:      {}", summary.alerts_created);
    println!("  Notifications sent:  {}", summary.notifications_sent);

    Ok(())
}
