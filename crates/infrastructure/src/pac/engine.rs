use super::helpers::{self, EvalEnv};
use crate::proxy::metrics::ProxyMetrics;
use async_trait::async_trait;
use boa_engine::{js_string, Context, Source};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::debug;
use wpadproxy_application::ports::{HostResolver, PacEvaluator, PacVerdict};
use wpadproxy_domain::DomainError;

/// PAC engine hosting one throwaway Boa interpreter per evaluation.
///
/// A fresh `Context` per call keeps script state from leaking across requests
/// and makes the cacheability flag a plain per-call cell flipped by the
/// temporal helpers. Evaluation runs on a blocking thread: it is CPU-bound,
/// and `dnsResolve`/`isResolvable` perform synchronous lookups.
pub struct BoaPacEngine {
    resolver: Arc<dyn HostResolver>,
    metrics: Arc<ProxyMetrics>,
}

impl BoaPacEngine {
    pub fn new(resolver: Arc<dyn HostResolver>, metrics: Arc<ProxyMetrics>) -> Self {
        Self { resolver, metrics }
    }
}

#[async_trait]
impl PacEvaluator for BoaPacEngine {
    async fn evaluate(
        &self,
        pac_text: &str,
        local_ip: &str,
        url: &str,
        host: &str,
    ) -> Result<PacVerdict, DomainError> {
        let pac_text = pac_text.to_owned();
        let local_ip = local_ip.to_owned();
        let url = url.to_owned();
        let host = host.to_owned();
        let resolver = Arc::clone(&self.resolver);
        let metrics = Arc::clone(&self.metrics);

        task::spawn_blocking(move || {
            let started = Instant::now();
            let result = run_script(&pac_text, &local_ip, &url, &host, resolver);
            metrics.pac_executions_total.inc();
            metrics
                .pac_execution_seconds
                .observe(started.elapsed().as_secs_f64());
            result
        })
        .await
        .map_err(|e| DomainError::PacEvaluationFailed(format!("evaluation task died: {e}")))?
    }
}

fn run_script(
    pac_text: &str,
    local_ip: &str,
    url: &str,
    host: &str,
    resolver: Arc<dyn HostResolver>,
) -> Result<PacVerdict, DomainError> {
    let mut context = Context::default();
    let env = Rc::new(EvalEnv {
        local_ip: local_ip.to_owned(),
        resolver,
        cacheable: Cell::new(true),
    });
    helpers::install(&mut context, Rc::clone(&env))
        .map_err(|e| DomainError::PacEvaluationFailed(e.to_string()))?;

    let script = format!(
        "{pac_text}\n\nvar output = FindProxyForURL({url}, {host});\n",
        url = js_literal(url),
        host = js_literal(host),
    );
    context
        .eval(Source::from_bytes(script.as_bytes()))
        .map_err(|e| DomainError::PacEvaluationFailed(e.to_string()))?;

    let global = context.global_object();
    let output = global
        .get(js_string!("output"), &mut context)
        .map_err(|e| DomainError::PacEvaluationFailed(e.to_string()))?;
    let raw = output
        .to_string(&mut context)
        .map_err(|e| DomainError::PacEvaluationFailed(e.to_string()))?
        .to_std_string_escaped();

    debug!(result = %raw, cacheable = env.cacheable.get(), "PAC script evaluated");
    Ok(PacVerdict {
        raw,
        cacheable: env.cacheable.get(),
    })
}

/// Quote a host value as a JS string literal for the driver line.
fn js_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
