use semantirs_core::agent::AgentId;
use semantirs_core::metrics::{Kilobytes, Meters};
use semantirs_models::device::node::{Point2D, Rsu, Vehicle};

pub fn make_vehicle(id: u64, x: f64, y: f64) -> Vehicle {
    Vehicle::builder()
        .id(AgentId::from(id))
        .position(Point2D::new(x, y))
        .speed(14.0)
        .payload(Kilobytes::new(1000.0))
        .build()
}

pub fn make_rsu(id: u64, x: f64, y: f64) -> Rsu {
    Rsu::builder()
        .id(AgentId::from(id))
        .position(Point2D::new(x, y))
        .coverage_radius(Meters::new(300.0))
        .build()
}

/// Four roadside units on the corners of a 1000 x 1000 square.
pub fn square_rsus() -> Vec<Rsu> {
    vec![
        make_rsu(0, 0.0, 0.0),
        make_rsu(1, 1000.0, 0.0),
        make_rsu(2, 0.0, 1000.0),
        make_rsu(3, 1000.0, 1000.0),
    ]
}

/// Vehicles spread along the diagonal of the square, ids starting at 100.
pub fn diagonal_fleet(count: usize) -> Vec<Vehicle> {
    (0..count)
        .map(|i| {
            let offset = 50.0 + 900.0 * i as f64 / count.max(1) as f64;
            make_vehicle(100 + i as u64, offset, offset)
        })
        .collect()
}
