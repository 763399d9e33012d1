use anyhow::{Context, Result};
use crate::initialization::init;
use crate::worker::run;

mod config;
mod errors;
mod forecast;
mod initialization;
mod manager_directions;
mod manager_influx;
mod manager_owm;
mod manager_postgres;
mod models;
mod schema;
mod scoring;
mod travel_time;
mod worker;

fn main() -> Result<()> {
    let (config, mut mgr) = init().context("initialization failed")?;

    run(&config, &mut mgr).context("collection failed")?;

    Ok(())
}
