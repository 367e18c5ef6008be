use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "podgrid",
    version,
    about = "Renders pod status and resource-metrics rows from cluster snapshots."
)]
pub struct CliArgs {
    /// Pod snapshot (kubectl get pods -o json|yaml), or '-' for stdin
    pub snapshot: String,

    /// Pod metrics snapshot (kubectl get pods.metrics.k8s.io -o json|yaml)
    #[arg(short, long)]
    pub metrics: Option<String>,

    /// Only render pods in this namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Include wide columns (resource totals, QOS, labels, validity)
    #[arg(short, long)]
    pub wide: bool,

    /// Colorize the STATUS column
    #[arg(long)]
    pub color: bool,

    /// Skip the header row
    #[arg(long)]
    pub no_headers: bool,

    /// Compute ages against this RFC3339 instant instead of now
    #[arg(long)]
    pub age_from: Option<String>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}
