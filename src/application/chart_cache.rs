use crate::application::catalogue::ChartCatalogue;
use crate::domain::errors::CatalogueError;
use crate::domain::series::{Chart, FlatPathPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Every catalogue chart generated once, shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ChartCache {
    charts: HashMap<String, Arc<Chart>>,
    order: Vec<String>,
}

impl ChartCache {
    pub fn build(catalogue: &ChartCatalogue, policy: FlatPathPolicy) -> Result<Self, CatalogueError> {
        let mut charts = HashMap::with_capacity(catalogue.charts.len());
        let mut order = Vec::with_capacity(catalogue.charts.len());

        for spec in &catalogue.charts {
            let chart = spec.build(policy)?;
            info!(
                "Generated chart {} ({} series x {} points)",
                chart.id,
                chart.series.len(),
                chart.points.len()
            );
            order.push(chart.id.clone());
            charts.insert(chart.id.clone(), Arc::new(chart));
        }

        Ok(Self { charts, order })
    }

    pub fn get(&self, id: &str) -> Result<Arc<Chart>, CatalogueError> {
        self.charts
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogueError::UnknownChart { id: id.to_string() })
    }

    /// Chart ids in catalogue order
    pub fn ids(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::catalogue::{NAV_CHART, STRESS_CHART};

    #[test]
    fn test_cache_serves_same_chart() {
        let cache = ChartCache::build(&ChartCatalogue::builtin(), FlatPathPolicy::Fail).unwrap();

        assert_eq!(cache.ids(), &[NAV_CHART.to_string(), STRESS_CHART.to_string()]);
        let first = cache.get(NAV_CHART).unwrap();
        let second = cache.get(NAV_CHART).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.get("missing").is_err());
    }
}
