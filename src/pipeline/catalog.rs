//! Built-in job catalog and caller-defined shapes

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use super::shape::PipelineShape;
use crate::error::{AggregationError, ErrorCode, Result};

static BUILTIN_SHAPES: Lazy<Vec<PipelineShape>> = Lazy::new(|| {
    let mut shapes = vec![
        PipelineShape::new(
            "server_disks",
            "servers",
            "hardware.disk",
            &[
                "general.server_id",
                "hardware.disk",
                "report_period",
                "ganymede_doc_version",
            ],
            "serverdisks${run_id}",
        ),
        PipelineShape::new(
            "server_nics",
            "servers",
            "hardware.nic",
            &[
                "general.server_id",
                "hardware.nic.nic_id",
                "report_period",
                "ganymede_doc_version",
            ],
            "servernics${run_id}",
        ),
        PipelineShape::new(
            "server_software_labels",
            "servers",
            "hardware.software_label",
            &[
                "general.server_id",
                "hardware.software_label.display_name",
                "report_period",
                "ganymede_doc_version",
            ],
            "serversoftwarelabels${run_id}",
        ),
        PipelineShape::new(
            "image_disks",
            "images",
            "hardware.disk",
            &[
                "general.image_id",
                "hardware.disk",
                "report_period",
                "ganymede_doc_version",
            ],
            "imagedisks${run_id}",
        ),
        PipelineShape::new(
            "mcp_geos",
            "mcps",
            "sites",
            &[
                "geo",
                "sites.mcp_id",
                "sites.display_name",
                "sites.type",
                "sites.site_name",
                "report_period",
                "ganymede_doc_version",
            ],
            "geos${run_id}",
        ),
        PipelineShape::new(
            "consistency_groups",
            "drs_cluster_pairs",
            "general.consistency_groups",
            &[
                "general.drs_pair_id",
                "report_period",
                "ganymede_doc_version",
                "general.consistency_groups.cg_id",
                "general.consistency_groups.state",
            ],
            "consistency_groups${run_id}",
        ),
    ];
    shapes.extend(reserved_shapes());
    shapes
});

// SolidFire jobs exist in the inventory schema but have never been enabled
#[cfg(feature = "reserved-shapes")]
fn reserved_shapes() -> Vec<PipelineShape> {
    vec![
        PipelineShape::new(
            "solidfire_accounts",
            "solidfire",
            "stats.accounts",
            &[
                "geo",
                "hostname",
                "name",
                "stats.accounts.accountID",
                "stats.accounts.username",
                "report_period",
                "ganymede_doc_version",
            ],
            "sf_accounts${run_id}",
        ),
        PipelineShape::new(
            "solidfire_nodes",
            "solidfire",
            "stats.nodes",
            &[
                "geo",
                "hostname",
                "name",
                "stats.nodes.nodeID",
                "stats.nodes.nodeType",
                "report_period",
                "ganymede_doc_version",
            ],
            "sf_nodes${run_id}",
        ),
    ]
}

#[cfg(not(feature = "reserved-shapes"))]
fn reserved_shapes() -> Vec<PipelineShape> {
    Vec::new()
}

/// The built-in job shapes, in catalog order
pub fn builtin_shapes() -> &'static [PipelineShape] {
    &BUILTIN_SHAPES
}

/// Look up a built-in shape by job name
pub fn find_shape(name: &str) -> Option<&'static PipelineShape> {
    BUILTIN_SHAPES.iter().find(|shape| shape.name == name)
}

#[derive(Debug, Deserialize)]
struct ShapeFile {
    #[serde(default)]
    shapes: Vec<PipelineShape>,
}

/// Built-in shapes plus any caller-defined ones
#[derive(Debug, Clone)]
pub struct ShapeCatalog {
    shapes: Vec<PipelineShape>,
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShapeCatalog {
    pub fn builtin() -> Self {
        Self {
            shapes: BUILTIN_SHAPES.clone(),
        }
    }

    /// Add a shape after validating it; job names must be unique
    pub fn add(&mut self, shape: PipelineShape) -> Result<()> {
        shape.validate()?;
        if self.get(&shape.name).is_some() {
            return Err(AggregationError::shape(
                ErrorCode::SHAPE_DUPLICATE,
                &shape.name,
                "a job with this name already exists",
            ));
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// Add every shape from a YAML document with a top-level `shapes` list
    pub fn extend_from_yaml(&mut self, content: &str) -> Result<usize> {
        let file: ShapeFile = serde_yaml::from_str(content)?;
        let count = file.shapes.len();
        for shape in file.shapes {
            self.add(shape)?;
        }
        Ok(count)
    }

    /// Load caller-defined shapes from a YAML file
    pub async fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AggregationError::config_with_code(
                ErrorCode::CONFIG_READ_FAILED,
                format!("Cannot read shapes file {}", path.display()),
            )
            .with_source(e)
        })?;
        let count = self
            .extend_from_yaml(&content)
            .map_err(|e| e.with_context(path.display()))?;
        debug!("Loaded {} shapes from {}", count, path.display());
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&PipelineShape> {
        self.shapes.iter().find(|shape| shape.name == name)
    }

    pub fn shapes(&self) -> &[PipelineShape] {
        &self.shapes
    }

    /// Resolve job names to shapes; an empty selection means every job
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<PipelineShape>> {
        if names.is_empty() {
            return Ok(self.shapes.clone());
        }

        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name).cloned().ok_or_else(|| {
                    let known: Vec<&str> = self.shapes.iter().map(|s| s.name.as_str()).collect();
                    AggregationError::shape(
                        ErrorCode::SHAPE_UNKNOWN,
                        name,
                        format!("unknown job, expected one of: {}", known.join(", ")),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shapes_are_valid() {
        for shape in builtin_shapes() {
            shape.validate().unwrap();
        }
    }

    #[cfg(not(feature = "reserved-shapes"))]
    #[test]
    fn test_builtin_job_names() {
        let names: Vec<&str> = builtin_shapes().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "server_disks",
                "server_nics",
                "server_software_labels",
                "image_disks",
                "mcp_geos",
                "consistency_groups",
            ]
        );
    }

    #[cfg(feature = "reserved-shapes")]
    #[test]
    fn test_reserved_shapes_present() {
        assert!(find_shape("solidfire_accounts").is_some());
        assert!(find_shape("solidfire_nodes").is_some());
    }

    #[test]
    fn test_find_shape() {
        let shape = find_shape("mcp_geos").unwrap();
        assert_eq!(shape.source_collection, "mcps");
        assert_eq!(shape.unwind_field, "sites");
        assert!(find_shape("nope").is_none());
    }

    #[test]
    fn test_select() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(
            catalog.select::<&str>(&[]).unwrap().len(),
            builtin_shapes().len()
        );

        let picked = catalog.select(&["image_disks", "server_nics"]).unwrap();
        assert_eq!(picked[0].name, "image_disks");
        assert_eq!(picked[1].name, "server_nics");

        let err = catalog.select(&["servers"]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SHAPE_UNKNOWN);
        assert!(err.to_string().contains("server_disks"));
    }

    #[test]
    fn test_extend_from_yaml() {
        let mut catalog = ShapeCatalog::builtin();
        let yaml = r#"
shapes:
  - name: vm_tags
    source_collection: vms
    unwind_field: tags
    projected_fields: [general.vm_id, tags.name, report_period]
    output_template: "vmtags${run_id}"
"#;
        assert_eq!(catalog.extend_from_yaml(yaml).unwrap(), 1);
        assert_eq!(catalog.get("vm_tags").unwrap().source_collection, "vms");
    }

    #[test]
    fn test_extend_rejects_duplicates_and_invalid_shapes() {
        let mut catalog = ShapeCatalog::builtin();
        let duplicate = r#"
shapes:
  - name: server_disks
    source_collection: servers
    unwind_field: hardware.disk
    projected_fields: [general.server_id]
    output_template: "x${run_id}"
"#;
        let err = catalog.extend_from_yaml(duplicate).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SHAPE_DUPLICATE);

        let invalid = r#"
shapes:
  - name: broken
    source_collection: servers
    unwind_field: ""
    projected_fields: [general.server_id]
    output_template: "x${run_id}"
"#;
        let err = catalog.extend_from_yaml(invalid).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SHAPE_EMPTY_FIELD);

        let err = catalog.extend_from_yaml("shapes: [1, 2").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_YAML);
    }
}
