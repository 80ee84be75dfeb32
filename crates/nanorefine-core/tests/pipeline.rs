use nalgebra::{Point3, Vector3};
use nanorefine::core::descriptors::cutoff::CutoffDescriptor;
use nanorefine::core::descriptors::precomputed::PrecomputedDescriptors;
use nanorefine::core::descriptors::traits::Fingerprint;
use nanorefine::core::io::batch::{JsonFile, StructureBatch};
use nanorefine::core::models::atom::Atom;
use nanorefine::core::models::structure::Structure;
use nanorefine::core::models::template::Template;
use nanorefine::engine::config::{QualityGateConfig, RefineConfig};
use nanorefine::engine::filters::outlier::{GateDecision, RelaxationOutcome};
use nanorefine::engine::progress::{Progress, ProgressReporter};
use nanorefine::workflows::refine::{self, FinalizeOptions};
use std::sync::Mutex;
use tempfile::tempdir;

fn pt_template() -> Template {
    Template::fcc111("Pt", (4, 4, 2), 3.92, 12.0).unwrap()
}

fn adatoms(template: &Template, sites: &[usize], height: f64, energy: f64) -> Structure {
    let top = template.top_layer_indices();
    sites
        .iter()
        .fold(template.structure().clone(), |structure, &site| {
            let below = template.structure().atoms()[top[site]].position;
            structure.with_atom(Atom::new("Pt", below + Vector3::new(0.0, 0.0, height)))
        })
        .with_energy(energy)
}

#[test]
fn ten_candidates_screen_down_to_one_per_surviving_group() {
    let template = pt_template();
    let groups = [
        ("A", vec![0.0, 0.4, 1.2, 1.5, 0.9]),
        ("B", vec![1.1, 1.8, 2.0]),
        ("C", vec![0.5, 1.3]),
    ];

    let mut store = PrecomputedDescriptors::new();
    let mut structures = Vec::new();
    for (fingerprint, energies) in &groups {
        for &energy in energies {
            let id = structures.len();
            let structure = template
                .structure()
                .clone()
                .with_atom(Atom::new("O", Point3::new(0.2 * id as f64, 1.0, 8.0)))
                .with_energy(energy);
            store.insert(&structure, Some(Fingerprint::new(*fingerprint)), None);
            structures.push(structure);
        }
    }
    assert_eq!(structures.len(), 10);

    let dir = tempdir().unwrap();
    let path = dir.path().join("candidates.json");
    StructureBatch::from_parts(&template, &structures, Some(&store))
        .write_to_path(&path)
        .unwrap();
    let parts = StructureBatch::read_from_path(&path)
        .unwrap()
        .into_parts()
        .unwrap();

    let events = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event| {
        if let Progress::StageSummary { stage, input, output } = event {
            events.lock().unwrap().push((stage, input, output));
        }
    }));

    let result = refine::screen(
        parts.structures,
        &parts.template,
        &parts.descriptors,
        &RefineConfig::default(),
        &reporter,
    )
    .unwrap();
    drop(reporter);

    let energies: Vec<f64> = result.structures.iter().filter_map(Structure::energy).collect();
    assert_eq!(energies, vec![0.0, 0.5]);
    assert!(result.structures.len() <= 3);
    assert_eq!(
        parts.descriptors.fingerprint_of(&result.structures[1]),
        Some(&Fingerprint::new("C"))
    );
    assert_eq!(
        events.into_inner().unwrap(),
        vec![("energy window", 10, 4), ("deduplication", 4, 2)]
    );
}

#[test]
fn finalize_keeps_the_best_joined_cluster_with_cutoff_descriptors() {
    let template = pt_template();
    let dimer = adatoms(&template, &[0, 1], 2.3, -1.0);
    let lower_dimer = adatoms(&template, &[0, 1], 2.35, -1.2);
    let split = adatoms(&template, &[0, 10], 2.3, -2.0);

    let result = refine::finalize(
        vec![dimer, lower_dimer.clone(), split],
        &template,
        &CutoffDescriptor::default(),
        &FinalizeOptions::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert_eq!(result.deduplication.output, 2);
    assert_eq!(result.structures, vec![lower_dimer]);
}

#[test]
fn quality_gate_resets_collapsed_relaxations_to_ground_truth() {
    let template = pt_template();
    let constraints = template.relaxation_constraints(template.len() + 2);

    let outcomes: Vec<RelaxationOutcome> = (0..100)
        .map(|i| {
            let change = if i < 80 {
                (i as f64 - 40.0) * 0.001
            } else {
                -5.0 + (i as f64 - 90.0) * 0.002
            };
            let ground_truth = -200.0 + 0.01 * i as f64;
            let unrelaxed = adatoms(&template, &[0, 1], 2.3 + 0.001 * i as f64, ground_truth)
                .with_constraints(constraints.clone());
            let relaxed = unrelaxed
                .clone()
                .translated_from(template.len(), Vector3::new(0.0, 0.0, -0.2));
            RelaxationOutcome::new(unrelaxed, relaxed, -50.0, -50.0 + change, ground_truth)
        })
        .collect();

    let result = refine::quality_gate(
        &outcomes,
        &QualityGateConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();

    assert!(result.threshold() > -4.9 && result.threshold() < -0.1);
    assert_eq!(result.structures.len(), 100);
    for (i, (structure, decision)) in result.structures.iter().zip(&result.decisions).enumerate() {
        if i < 80 {
            assert_eq!(*decision, GateDecision::Accepted);
            assert_eq!(structure, &outcomes[i].relaxed);
        } else {
            assert_eq!(*decision, GateDecision::Rejected);
            assert_eq!(structure.atoms(), outcomes[i].unrelaxed.atoms());
            assert!(structure.constraints().is_empty());
            assert_eq!(structure.energy(), Some(outcomes[i].reference_energy));
        }
    }
}
