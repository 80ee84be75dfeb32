use super::{load_batches, write_batch};
use crate::cli::GraphFilterArgs;
use crate::config::{CliOverrides, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use nanorefine::engine::progress::ProgressReporter;
use nanorefine::workflows::refine;
use tracing::info;

pub fn run(args: GraphFilterArgs) -> Result<()> {
    let overrides = CliOverrides {
        descriptor_kind: args.descriptor.descriptor,
        cutoff_scale: args.descriptor.cutoff_scale,
        ..Default::default()
    };
    let config = build_config(&args.common, &overrides)?;
    let descriptor_config = &config.core_config.descriptor;

    let parts = load_batches(&config.input_paths)?;
    let descriptor = refine::descriptor_for(descriptor_config, parts.descriptors.clone());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Deduplicating {} structure(s) by '{}' fingerprints...",
        parts.structures.len(),
        descriptor.name()
    );
    info!(
        descriptor = descriptor.name(),
        "Invoking the deduplication stage..."
    );
    let result = refine::deduplicate(
        parts.structures,
        &parts.template,
        descriptor.as_ref(),
        &reporter,
    )?;

    write_batch(
        &config.output_path,
        &parts.template,
        &result.structures,
        Some(&parts.descriptors),
    )?;
    println!(
        "✓ {} distinct structure(s) out of {}, written to: {}",
        result.report.output,
        result.report.input,
        config.output_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DescriptorArgs;
    use crate::commands::test_support::{common_args, dimer, template};
    use crate::error::CliError;
    use nanorefine::core::descriptors::precomputed::PrecomputedDescriptors;
    use nanorefine::core::descriptors::traits::Fingerprint;
    use nanorefine::core::io::batch::{JsonFile, StructureBatch};
    use nanorefine::core::models::structure::Structure;
    use nanorefine::engine::config::DescriptorKind;
    use nanorefine::engine::error::RefineError;
    use tempfile::tempdir;

    #[test]
    fn keeps_the_lowest_energy_structure_per_fingerprint() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("windowed.json");
        let output = dir.path().join("unique.json");

        let template = template();
        let mut store = PrecomputedDescriptors::new();
        let specs = [("hcp", -4.0), ("fcc", -4.6), ("hcp", -4.3), ("fcc", -4.1)];
        let structures: Vec<Structure> = specs
            .iter()
            .enumerate()
            .map(|(id, &(fingerprint, energy))| {
                let structure = dimer(&template, id, energy);
                store.insert(&structure, Some(Fingerprint::new(fingerprint)), None);
                structure
            })
            .collect();
        StructureBatch::from_parts(&template, &structures, Some(&store))
            .write_to_path(&input)
            .unwrap();

        run(GraphFilterArgs {
            common: common_args(&input, &output),
            descriptor: DescriptorArgs::default(),
        })
        .unwrap();

        let batch = StructureBatch::read_from_path(&output).unwrap();
        let fingerprints: Vec<&str> = batch
            .structures
            .iter()
            .filter_map(|record| record.fingerprint.as_ref().map(Fingerprint::as_str))
            .collect();
        assert_eq!(fingerprints, vec!["fcc", "hcp"]);

        let parts = batch.into_parts().unwrap();
        let energies: Vec<f64> = parts.structures.iter().filter_map(Structure::energy).collect();
        assert_eq!(energies, vec![-4.6, -4.3]);
    }

    #[test]
    fn missing_precomputed_fingerprints_are_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("windowed.json");
        let output = dir.path().join("unique.json");

        let template = template();
        let structures = vec![dimer(&template, 0, -1.0)];
        StructureBatch::from_parts(&template, &structures, None)
            .write_to_path(&input)
            .unwrap();

        let result = run(GraphFilterArgs {
            common: common_args(&input, &output),
            descriptor: DescriptorArgs::default(),
        });
        assert!(matches!(
            result,
            Err(CliError::Refine(RefineError::Descriptor { .. }))
        ));
    }

    #[test]
    fn cutoff_descriptor_needs_no_precomputed_values() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("windowed.json");
        let output = dir.path().join("unique.json");

        let template = template();
        let structures = vec![dimer(&template, 0, -1.0), dimer(&template, 0, -2.0)];
        StructureBatch::from_parts(&template, &structures, None)
            .write_to_path(&input)
            .unwrap();

        run(GraphFilterArgs {
            common: common_args(&input, &output),
            descriptor: DescriptorArgs {
                descriptor: Some(DescriptorKind::Cutoff),
                cutoff_scale: None,
            },
        })
        .unwrap();

        let parts = StructureBatch::read_from_path(&output)
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(parts.structures.len(), 1);
        assert_eq!(parts.structures[0].energy(), Some(-2.0));
    }
}
