use acoustic_bem::assembly::BoundaryAssembler;
use acoustic_bem::boundary::IncidentField;
use acoustic_bem::kernel::QuadratureKernelEvaluator;
use acoustic_bem::quadrature::QuadratureRules;
use acoustic_bem::solver::ExteriorProblem;
use acoustic_bem::types::c64;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn assembly_parts_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.sample_size(20);

    let kernel = QuadratureKernelEvaluator::default();
    let rules = QuadratureRules::new();
    let k = 2.0;
    let coupling = ExteriorProblem::default_coupling(k);

    for i in 2..4 {
        let mesh = acoustic_bem::shapes::regular_sphere(i).unwrap();
        let incident = IncidentField::plane_wave(k, [0.0, 0.0, 1.0], &mesh, &[]);
        let n = mesh.number_of_elements();

        for parallel in [false, true] {
            let assembler = BoundaryAssembler::new(&mesh, &kernel, &rules, parallel);
            group.bench_function(
                format!(
                    "Assembly of {n}x{n} coupled system ({})",
                    if parallel { "parallel" } else { "serial" }
                ),
                |b| b.iter(|| black_box(assembler.assemble(k, coupling, &incident))),
            );
        }

        let conventional = BoundaryAssembler::new(&mesh, &kernel, &rules, true);
        group.bench_function(
            format!("Assembly of {n}x{n} conventional system"),
            |b| b.iter(|| black_box(conventional.assemble(k, c64::new(0.0, 0.0), &incident))),
        );
    }
    group.finish();
}

criterion_group!(benches, assembly_parts_benchmark);
criterion_main!(benches);
