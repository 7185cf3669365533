use crate::config::Config;
use crate::dashboard::pages::{PageIndex, PageSpec, TablePage};
use crate::dashboard::{AppPath, Application, HostError, Registry};

/// The dashboard's page catalog in display order
fn table_specs() -> Vec<(&'static str, Vec<(&'static str, PageSpec)>)> {
    vec![
        (
            "Status",
            vec![
                (
                    "Workers",
                    PageSpec::get("Workers", "/v1/cluster/workers")
                        .rows_key("workers")
                        .column("id", "Worker")
                        .column("host", "Host")
                        .column("state", "State")
                        .column("runningTasks", "Tasks")
                        .column("lastHeartbeat", "Heartbeat")
                        .min_interval(2),
                ),
                (
                    "Schedulers",
                    PageSpec::get("Schedulers", "/v1/cluster/schedulers")
                        .rows_key("schedulers")
                        .column("id", "Scheduler")
                        .column("host", "Host")
                        .column("role", "Role")
                        .column("queuedQueries", "Queued")
                        .min_interval(5),
                ),
                (
                    "Queries",
                    PageSpec::get("Queries", "/v1/queries")
                        .param("state", "running")
                        .rows_key("queries")
                        .column("queryId", "Query")
                        .column("user", "User")
                        .column("state", "State")
                        .column("elapsedMs", "Elapsed ms")
                        .column("sql", "SQL")
                        .min_interval(1),
                ),
            ],
        ),
        (
            "Config",
            vec![(
                "Replication",
                PageSpec::get("Replication", "/v1/replication/config")
                    .rows_key("tables")
                    .column("table", "Table")
                    .column("replicas", "Replicas")
                    .column("placement", "Placement")
                    .min_interval(10),
            )],
        ),
        (
            "Ingest",
            vec![(
                "Transactions",
                PageSpec::get("Transactions", "/v1/ingest/transactions")
                    .rows_key("transactions")
                    .column("txnId", "Txn")
                    .column("table", "Table")
                    .column("state", "State")
                    .column("rows", "Rows")
                    .column("startedAt", "Started")
                    .min_interval(3),
            )],
        ),
        (
            "Tools",
            vec![(
                "SQL",
                PageSpec::post("SQL", "/v1/sql/history")
                    .param("limit", "50")
                    .rows_key("statements")
                    .column("statementId", "Statement")
                    .column("user", "User")
                    .column("status", "Status")
                    .column("sql", "SQL")
                    .min_interval(5),
            )],
        ),
    ]
}

/// Category and name of the self-test page listing every registered path
pub const INDEX_CATEGORY: &str = "Tools";
pub const INDEX_NAME: &str = "Pages";

/// Builds the registry for the whole dashboard, applying interval overrides
/// from `config`. The page index goes last, under Tools.
pub fn catalog(config: &Config) -> Result<Registry, HostError> {
    let specs = table_specs();

    let mut paths: Vec<AppPath> = specs
        .iter()
        .flat_map(|(category, pages)| {
            pages
                .iter()
                .map(move |(name, _)| AppPath::new(*category, *name))
        })
        .collect();
    let index_path = AppPath::new(INDEX_CATEGORY, INDEX_NAME);
    paths.push(index_path.clone());

    let mut groups: Vec<(String, Vec<(String, Box<dyn Application>)>)> = specs
        .into_iter()
        .map(|(category, pages)| {
            let apps = pages
                .into_iter()
                .map(|(name, spec)| {
                    let path = AppPath::new(category, name);
                    let interval = config.interval_for(&path, spec.min_interval);
                    let page: Box<dyn Application> =
                        Box::new(TablePage::new(spec.min_interval(interval)));
                    (name.to_string(), page)
                })
                .collect();
            (category.to_string(), apps)
        })
        .collect();

    groups.push((
        index_path.category().to_string(),
        vec![(
            index_path.name().to_string(),
            Box::new(PageIndex::new(paths)) as Box<dyn Application>,
        )],
    ));

    Registry::from_groups(groups)
}
