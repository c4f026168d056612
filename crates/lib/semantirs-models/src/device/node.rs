use serde::Deserialize;
use typed_builder::TypedBuilder;

use semantirs_core::agent::{AgentId, AgentKind};
use semantirs_core::metrics::{Kilobytes, Meters};

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> Meters {
        Meters::new((self.x - other.x).hypot(self.y - other.y))
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// A connected vehicle with a fixed sensor payload to offload. Built once per scenario.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct Vehicle {
    pub id: AgentId,
    #[builder(default = AgentKind::Vehicle)]
    pub kind: AgentKind,
    pub position: Point2D,
    pub speed: f64,
    pub payload: Kilobytes,
}

/// A roadside unit. The coverage radius is kept for reporting only and does not restrict
/// which vehicles it can serve.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct Rsu {
    pub id: AgentId,
    #[builder(default = AgentKind::RSU)]
    pub kind: AgentKind,
    pub position: Point2D,
    pub coverage_radius: Meters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), Meters::new(5.0));
        assert_eq!(b.distance_to(&a), Meters::new(5.0));
    }

    #[test]
    fn test_builders_set_kind() {
        let vehicle = Vehicle::builder()
            .id(AgentId::from(1u64))
            .position(Point2D::new(1.0, 2.0))
            .speed(12.0)
            .payload(Kilobytes::new(1000.0))
            .build();
        assert_eq!(vehicle.kind, AgentKind::Vehicle);
        let rsu = Rsu::builder()
            .id(AgentId::from(2u64))
            .position(Point2D::default())
            .coverage_radius(Meters::new(300.0))
            .build();
        assert_eq!(rsu.kind, AgentKind::RSU);
    }
}
