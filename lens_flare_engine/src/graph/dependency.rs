/// Entry/exit dependency template and pass chain validation
///
/// Every render pass declares the same two external dependencies:
///
/// - entry (EXTERNAL -> 0): fragment-shader reads of earlier consumers
///   finish before this pass writes its color attachments
/// - exit (0 -> EXTERNAL): this pass's color writes are visible to the
///   fragment-shader reads of the next consumer
///
/// Both are by-region since every pass is a per-pixel full-screen transform.

use crate::error::{Error, Result};
use crate::engine_error;
use crate::graph::binding::BindingSource;
use crate::graph::pass::{PassDesc, PassId, find_pass};
use crate::renderer::{PassDependency, SubpassRef, PipelineStages, AccessFlags};

pub fn entry_dependency() -> PassDependency {
    PassDependency {
        src_subpass: SubpassRef::External,
        dst_subpass: SubpassRef::Index(0),
        src_stages: PipelineStages::FRAGMENT_SHADER,
        dst_stages: PipelineStages::COLOR_ATTACHMENT_OUTPUT,
        src_access: AccessFlags::SHADER_READ,
        dst_access: AccessFlags::COLOR_ATTACHMENT_WRITE,
        by_region: true,
    }
}

pub fn exit_dependency() -> PassDependency {
    PassDependency {
        src_subpass: SubpassRef::Index(0),
        dst_subpass: SubpassRef::External,
        src_stages: PipelineStages::COLOR_ATTACHMENT_OUTPUT,
        dst_stages: PipelineStages::FRAGMENT_SHADER,
        src_access: AccessFlags::COLOR_ATTACHMENT_WRITE,
        dst_access: AccessFlags::SHADER_READ,
        by_region: true,
    }
}

/// The two dependencies every pass declares, entry first
pub fn pass_dependencies() -> Vec<PassDependency> {
    vec![entry_dependency(), exit_dependency()]
}

/// Producer -> consumer edges implied by the binding lists, deduplicated,
/// in consumer execution order
pub fn pass_edges(table: &[PassDesc]) -> Vec<(PassId, PassId)> {
    let mut edges = Vec::new();
    for consumer in table {
        for entry in consumer.bindings {
            if let BindingSource::Attachment { pass, .. } = entry.source {
                let edge = (pass, consumer.id);
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }
    }
    edges
}

/// Check bidirectional barrier correctness for every producer -> consumer edge
///
/// `dependencies_of(pass)` returns the dependencies declared by the render
/// pass of `pass`.
pub fn validate_pass_chain<F>(table: &[PassDesc], dependencies_of: F) -> Result<()>
where
    F: Fn(PassId) -> Vec<PassDependency>,
{
    for (producer, consumer) in pass_edges(table) {
        find_pass(table, producer)?;

        let producer_deps = dependencies_of(producer);
        let write_before_read = producer_deps.iter().any(|dep| {
            dep.is_exit()
                && dep.by_region
                && dep.orders(
                    PipelineStages::COLOR_ATTACHMENT_OUTPUT,
                    AccessFlags::COLOR_ATTACHMENT_WRITE,
                    PipelineStages::FRAGMENT_SHADER,
                    AccessFlags::SHADER_READ,
                )
        });
        if !write_before_read {
            engine_error!("lensflare::graph",
                "Pass '{}' has no exit dependency making its writes visible to '{}'",
                producer.name(), consumer.name());
            return Err(Error::InvalidResource(format!(
                "pass '{}' lacks a by-region exit dependency ordering color writes before '{}' shader reads",
                producer.name(), consumer.name()
            )));
        }

        let consumer_deps = dependencies_of(consumer);
        let read_before_write = consumer_deps.iter().any(|dep| {
            dep.is_entry()
                && dep.by_region
                && dep.orders(
                    PipelineStages::FRAGMENT_SHADER,
                    AccessFlags::SHADER_READ,
                    PipelineStages::COLOR_ATTACHMENT_OUTPUT,
                    AccessFlags::COLOR_ATTACHMENT_WRITE,
                )
        });
        if !read_before_write {
            engine_error!("lensflare::graph",
                "Pass '{}' has no entry dependency ordering reads of '{}' before its writes",
                consumer.name(), producer.name());
            return Err(Error::InvalidResource(format!(
                "pass '{}' lacks a by-region entry dependency ordering shader reads before color writes",
                consumer.name()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
