//! Route management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ntc_core::error::AppError;
use ntc_core::types::RouteId;
use ntc_entity::{Route, RouteDraft};
use ntc_view::manage::RoutesView;

use super::AppContext;
use crate::output;

/// Arguments for route commands
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Route subcommand
    #[command(subcommand)]
    pub command: RouteCommand,
}

/// Route fields shared by `add` and `update`
#[derive(Debug, Args)]
pub struct RouteFields {
    /// Origin
    #[arg(long)]
    pub from: String,
    /// Destination
    #[arg(long)]
    pub to: String,
    /// Distance in kilometres
    #[arg(long)]
    pub distance: f64,
    /// Fare per seat
    #[arg(long)]
    pub fare: f64,
}

impl From<&RouteFields> for RouteDraft {
    fn from(f: &RouteFields) -> Self {
        Self {
            start_point: f.from.clone(),
            end_point: f.to.clone(),
            distance: f.distance,
            fare: f.fare,
        }
    }
}

/// Route subcommands
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// List routes
    List {
        /// Filter by start or end point
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a route
    Add(RouteFields),
    /// Update a route
    Update {
        /// Route ID
        id: RouteId,
        #[command(flatten)]
        fields: RouteFields,
    },
    /// Delete a route
    Delete {
        /// Route ID
        id: RouteId,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Route display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct RouteRow {
    /// Route ID
    id: String,
    /// From
    from: String,
    /// To
    to: String,
    /// Distance
    distance: String,
    /// Fare
    fare: String,
}

impl From<&Route> for RouteRow {
    fn from(r: &Route) -> Self {
        Self {
            id: r.id.to_string(),
            from: r.start_point.clone(),
            to: r.end_point.clone(),
            distance: format!("{:.1} km", r.distance),
            fare: format!("{:.2}", r.fare),
        }
    }
}

/// Execute route commands
pub async fn execute(args: &RouteArgs, app: &AppContext) -> Result<(), AppError> {
    let view = RoutesView::new(app.api.clone(), app.view.clone());

    match &args.command {
        RouteCommand::List { search } => {
            view.load().await?;
            let routes = view.filtered(search.as_deref().unwrap_or_default());
            let rows: Vec<RouteRow> = routes.iter().map(RouteRow::from).collect();
            output::print_list(&rows, app.format);
        }
        RouteCommand::Add(fields) => view.create(&RouteDraft::from(fields)).await?,
        RouteCommand::Update { id, fields } => {
            view.update(id, &RouteDraft::from(fields)).await?;
        }
        RouteCommand::Delete { id, force } => {
            if output::confirm(&format!("Delete route {id}?"), *force)? {
                view.delete(id).await?;
            } else {
                println!("Aborted.");
            }
        }
    }

    Ok(())
}
