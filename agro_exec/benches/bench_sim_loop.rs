//! # Driving Loop Benchmark

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector2;

use agro_lib::{field, sim_loop, veh_ctrl};

fn sim_loop_benchmark(c: &mut Criterion) {
    // ---- Build the reference scenario ----

    let field = field::Field::new(field::Params {
        width_m: 100.0,
        height_m: 200.0,
        lane_width_m: 10.0,
        crop_line: field::CropLineParams {
            amplitude_m: 5.0,
            spatial_freq_rad_m: 0.05,
        },
        target: field::TargetParams {
            detection_radius_m: 3.0,
        },
    })
    .unwrap();

    let sim_params = sim_loop::Params {
        dt_s: 0.1,
        max_steps: 400,
        start_pos_m: Vector2::new(45.0, 0.0),
        start_heading_rad: 0.0,
    };

    c.bench_function("sim_loop reference run", |b| {
        b.iter(|| {
            sim_loop::run(
                &sim_params,
                veh_ctrl::Params {
                    speed_ms: 6.0,
                    steer_k_p: 0.1,
                },
                &field,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, sim_loop_benchmark);
criterion_main!(benches);
