//! Binary entry point: resolve configuration, start logging, open the store,
//! hand the connection to the worker, and drive the Ratatui event loop until
//! the user exits.
use clap::Parser;

use department_admin::config::{Cli, Config};
use department_admin::ui::Worker;
use department_admin::{logging, open_database, run_app, seed_demo_data, App};

fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    logging::init(&config)?;

    let conn = open_database(&config.db_path)?;
    if config.seed_demo && seed_demo_data(&conn)? {
        tracing::info!("demo data inserted");
    }

    let mut app = App::new(Worker::spawn(conn)?);
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!("application stopped: {err:#}");
    }
    result
}
