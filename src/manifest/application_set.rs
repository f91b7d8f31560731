//! ApplicationSet addon chart extractor
//!
//! Addon ApplicationSets carry their chart coordinates as cluster generator
//! values:
//!
//! ```yaml
//! spec:
//!   generators:
//!     - merge:
//!         generators:
//!           - clusters:
//!               values:
//!                 addonChart: cert-manager
//!                 addonChartVersion: v1.13.2
//!                 addonChartRepository: https://charts.jetstack.io
//! ```

use super::{string_at, Extractor};
use crate::domain::{DependencyRecord, SourceLocator};
use serde_yaml::Value;

/// Extracts Helm chart coordinates from addon ApplicationSets
#[derive(Debug, Default, Clone, Copy)]
pub struct ApplicationSetExtractor;

impl ApplicationSetExtractor {
    fn cluster_values(doc: &Value) -> Option<&Value> {
        doc.get("spec")?
            .get("generators")?
            .get(0)?
            .get("merge")?
            .get("generators")?
            .get(0)?
            .get("clusters")?
            .get("values")
    }
}

impl Extractor for ApplicationSetExtractor {
    fn name(&self) -> &'static str {
        "applicationset"
    }

    fn extract(&self, doc: &Value) -> Option<DependencyRecord> {
        let values = Self::cluster_values(doc)?;
        let chart = string_at(values, "addonChart")?;
        let version = string_at(values, "addonChartVersion")?;
        let repository = string_at(values, "addonChartRepository")?;

        Some(DependencyRecord::new(
            chart,
            version,
            SourceLocator::helm(repository, chart),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceKind;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    const CERT_MANAGER: &str = r#"
apiVersion: argoproj.io/v1alpha1
kind: ApplicationSet
metadata:
  name: addons-cert-manager
spec:
  generators:
    - merge:
        mergeKeys: [server]
        generators:
          - clusters:
              values:
                addonChart: cert-manager
                addonChartVersion: v1.13.2
                addonChartRepository: https://charts.jetstack.io
              selector:
                matchExpressions:
                  - key: enable_cert_manager
                    operator: In
                    values: ['true']
          - clusters:
              selector:
                matchLabels:
                  environment: prod
"#;

    #[test]
    fn test_extract_cert_manager() {
        let record = ApplicationSetExtractor.extract(&parse(CERT_MANAGER)).unwrap();
        assert_eq!(record.name, "cert-manager");
        assert_eq!(record.current_version, "v1.13.2");
        assert_eq!(
            record.locator,
            SourceLocator::helm("https://charts.jetstack.io", "cert-manager")
        );
        assert_eq!(record.locator.kind(), SourceKind::Helm);
    }

    #[test]
    fn test_missing_repository_yields_none() {
        let doc = parse(
            r#"
spec:
  generators:
    - merge:
        generators:
          - clusters:
              values:
                addonChart: cert-manager
                addonChartVersion: v1.13.2
"#,
        );
        assert!(ApplicationSetExtractor.extract(&doc).is_none());
    }

    #[test]
    fn test_wrong_type_yields_none() {
        let doc = parse(
            r#"
spec:
  generators:
    - merge:
        generators:
          - clusters:
              values:
                addonChart: cert-manager
                addonChartVersion: 1.5
                addonChartRepository: https://charts.jetstack.io
"#,
        );
        assert!(ApplicationSetExtractor.extract(&doc).is_none());
    }

    #[test]
    fn test_generators_not_a_list_yields_none() {
        let doc = parse(
            r#"
spec:
  generators:
    merge:
      generators: []
"#,
        );
        assert!(ApplicationSetExtractor.extract(&doc).is_none());
    }

    #[test]
    fn test_first_generator_only() {
        // Values in the second merge generator are not part of the shape
        let doc = parse(
            r#"
spec:
  generators:
    - list:
        elements: []
    - merge:
        generators:
          - clusters:
              values:
                addonChart: cert-manager
                addonChartVersion: v1.13.2
                addonChartRepository: https://charts.jetstack.io
"#,
        );
        assert!(ApplicationSetExtractor.extract(&doc).is_none());
    }

    #[test]
    fn test_scalar_document_yields_none() {
        assert!(ApplicationSetExtractor.extract(&parse("just a string")).is_none());
        assert!(ApplicationSetExtractor.extract(&Value::Null).is_none());
    }
}
