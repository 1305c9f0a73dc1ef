//! Shared fixtures: a recording stub kernel and small networks/grids.
#![allow(dead_code)]

use mesh_links::geometry::Coordinate;
use mesh_links::kernel::{Contacts, GeometryList, Mesh1d, Mesh2d, MeshKernel, STATUS_OK};
use mesh_links::network::{
    Branch, BranchIndex, CompartmentKind, Discretization, DiscretizationPoint, SewerConnection,
    WaterType,
};

/// Deterministic kernel double.
///
/// Contacts go from each masked node to the face with the nearest centre.
/// For multiple contacts the stub "rebuilds" the 2D mesh in reverse face
/// order and appends one face outside the domain, so its face indices do not
/// match the domain grid.
#[derive(Default)]
pub struct StubKernel {
    pub invocations: Vec<&'static str>,
    pub allocated: usize,
    pub deallocated: usize,
    pub fail_on: Option<&'static str>,
    pub panic_on: Option<&'static str>,
    mesh1d: Mesh1d,
    mesh2d: Mesh2d,
    native_mesh: Option<Mesh2d>,
    contacts: Contacts,
    pub last_polygon: Option<GeometryList>,
    pub last_points: Option<GeometryList>,
    pub last_distance: Option<f64>,
}

impl StubKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    pub fn panicking_on(operation: &'static str) -> Self {
        Self {
            panic_on: Some(operation),
            ..Self::default()
        }
    }

    /// Number of kernel calls of any kind.
    pub fn call_count(&self) -> usize {
        self.invocations.len()
    }

    fn record(&mut self, op: &'static str) -> i32 {
        self.invocations.push(op);
        if self.panic_on == Some(op) {
            panic!("stub kernel aborted in {op}");
        }
        if self.fail_on == Some(op) { 1 } else { STATUS_OK }
    }

    fn node(&self, i: usize) -> Coordinate {
        Coordinate::new(self.mesh1d.node_x[i], self.mesh1d.node_y[i])
    }

    fn face_centres(mesh: &Mesh2d) -> Vec<Coordinate> {
        mesh.face_x
            .iter()
            .zip(&mesh.face_y)
            .map(|(&x, &y)| Coordinate::new(x, y))
            .collect()
    }

    fn nearest(target: Coordinate, candidates: &[Coordinate]) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance(&target)
                    .partial_cmp(&b.distance(&target))
                    .unwrap()
            })
            .map(|(i, _)| i)
    }

    fn in_ring(ring: &GeometryList, p: Coordinate) -> bool {
        let xs = &ring.x;
        let ys = &ring.y;
        let (min_x, max_x) = xs.iter().fold((f64::MAX, f64::MIN), |(a, b), &x| (a.min(x), b.max(x)));
        let (min_y, max_y) = ys.iter().fold((f64::MAX, f64::MIN), |(a, b), &y| (a.min(y), b.max(y)));
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }

    fn nearest_face_contacts(&mut self, mask: &[i32], polygon: Option<&GeometryList>) {
        let centres = Self::face_centres(&self.mesh2d);
        let mut contacts = Contacts::default();
        for (i, &flag) in mask.iter().enumerate() {
            if flag == 0 {
                continue;
            }
            let node = self.node(i);
            if let Some(ring) = polygon {
                if !Self::in_ring(ring, node) {
                    continue;
                }
            }
            if let Some(face) = Self::nearest(node, &centres) {
                contacts.mesh1d_indices.push(i as i32);
                contacts.mesh2d_indices.push(face as i32);
            }
        }
        self.contacts = contacts;
    }
}

impl MeshKernel for StubKernel {
    fn allocate_state(&mut self, session_id: &mut i32) -> i32 {
        self.allocated += 1;
        *session_id = self.allocated as i32;
        self.record("allocate_state")
    }

    fn set_mesh1d(&mut self, _: i32, mesh: &Mesh1d) -> i32 {
        self.mesh1d = mesh.clone();
        self.record("set_mesh1d")
    }

    fn set_mesh2d(&mut self, _: i32, mesh: &Mesh2d) -> i32 {
        self.mesh2d = mesh.clone();
        self.record("set_mesh2d")
    }

    fn compute_single_contacts(
        &mut self,
        _: i32,
        mask: &[i32],
        polygon: &GeometryList,
        search_tolerance: f64,
    ) -> i32 {
        self.last_polygon = Some(polygon.clone());
        self.last_distance = Some(search_tolerance);
        let status = self.record("compute_single_contacts");
        if status == STATUS_OK {
            self.nearest_face_contacts(mask, Some(polygon));
        }
        status
    }

    fn compute_multiple_contacts(&mut self, _: i32, mask: &[i32]) -> i32 {
        let status = self.record("compute_multiple_contacts");
        if status != STATUS_OK {
            return status;
        }
        // Reverse the faces and add one far outside the domain.
        let n = self.mesh2d.num_faces();
        let mut native = self.mesh2d.clone();
        native.face_x.reverse();
        native.face_y.reverse();
        native.face_x.push(1.0e6);
        native.face_y.push(1.0e6);
        native.nodes_per_face.push(0);
        let centres = Self::face_centres(&self.mesh2d);
        let mut contacts = Contacts::default();
        for (i, &flag) in mask.iter().enumerate() {
            if flag == 0 {
                continue;
            }
            if let Some(face) = Self::nearest(self.node(i), &centres) {
                contacts.mesh1d_indices.push(i as i32);
                contacts.mesh2d_indices.push((n - 1 - face) as i32);
            }
        }
        // The first masked node also touches the phantom face.
        if let Some(first) = contacts.mesh1d_indices.first().copied() {
            contacts.mesh1d_indices.push(first);
            contacts.mesh2d_indices.push(n as i32);
        }
        self.native_mesh = Some(native);
        self.contacts = contacts;
        status
    }

    fn compute_boundary_contacts(
        &mut self,
        _: i32,
        mask: &[i32],
        polygon: &GeometryList,
        search_distance: f64,
    ) -> i32 {
        self.last_polygon = Some(polygon.clone());
        self.last_distance = Some(search_distance);
        let status = self.record("compute_boundary_contacts");
        if status == STATUS_OK {
            self.nearest_face_contacts(mask, Some(polygon));
        }
        status
    }

    fn compute_contacts_with_points(&mut self, _: i32, mask: &[i32], points: &GeometryList) -> i32 {
        self.last_points = Some(points.clone());
        let status = self.record("compute_contacts_with_points");
        if status != STATUS_OK {
            return status;
        }
        let centres = Self::face_centres(&self.mesh2d);
        let nodes: Vec<(usize, Coordinate)> = mask
            .iter()
            .enumerate()
            .filter(|(_, f)| **f != 0)
            .map(|(i, _)| (i, self.node(i)))
            .collect();
        let node_coords: Vec<Coordinate> = nodes.iter().map(|(_, c)| *c).collect();
        let mut contacts = Contacts::default();
        for (&x, &y) in points.x.iter().zip(&points.y) {
            let p = Coordinate::new(x, y);
            let (Some(face), Some(node)) = (Self::nearest(p, &centres), Self::nearest(p, &node_coords))
            else {
                continue;
            };
            contacts.mesh1d_indices.push(nodes[node].0 as i32);
            contacts.mesh2d_indices.push(face as i32);
        }
        self.contacts = contacts;
        status
    }

    fn get_contacts(&mut self, _: i32, contacts: &mut Contacts) -> i32 {
        let status = self.record("get_contacts");
        if status == STATUS_OK {
            *contacts = self.contacts.clone();
        }
        status
    }

    fn get_mesh2d(&mut self, _: i32, mesh: &mut Mesh2d) -> i32 {
        let status = self.record("get_mesh2d");
        if status == STATUS_OK {
            *mesh = self.native_mesh.clone().unwrap_or_else(|| self.mesh2d.clone());
        }
        status
    }

    fn deallocate_state(&mut self, _: i32) -> i32 {
        self.deallocated += 1;
        self.record("deallocate_state")
    }
}

/// `n` collinear points along y = `y`, x = 0.5, 1.5, ... on one branch.
pub fn straight_branch(n: usize, y: f64, kind: Option<SewerConnection>) -> Discretization {
    let length = n as f64;
    let branch = match kind {
        Some(sewer) => Branch::sewer("b0", length, sewer),
        None => Branch::channel("b0", length),
    };
    let points = (0..n)
        .map(|i| DiscretizationPoint {
            branch: BranchIndex(0),
            chainage: i as f64 + 0.5,
            coordinate: Coordinate::new(i as f64 + 0.5, y),
        })
        .collect();
    Discretization::new(vec![branch], points).unwrap()
}

/// `n` collinear points along y = 0.5, x = 0.5, 1.5, ..., each on its own
/// one-unit sewer pipe and sitting on that pipe's outlet end. Even pipes drain
/// at their target (chainage = length), odd pipes at their source (chainage 0).
pub fn outlet_pipes(n: usize, water_type: WaterType) -> Discretization {
    let mut branches = Vec::new();
    let mut points = Vec::new();
    for i in 0..n {
        let outlet_at_target = i % 2 == 0;
        let (source, target, chainage) = if outlet_at_target {
            (CompartmentKind::Manhole, CompartmentKind::Outlet, 1.0)
        } else {
            (CompartmentKind::Outlet, CompartmentKind::Manhole, 0.0)
        };
        branches.push(Branch::sewer(
            format!("pipe{i}"),
            1.0,
            SewerConnection {
                water_type,
                source,
                target,
            },
        ));
        points.push(DiscretizationPoint {
            branch: BranchIndex(i),
            chainage,
            coordinate: Coordinate::new(i as f64 + 0.5, 0.5),
        });
    }
    Discretization::new(branches, points).unwrap()
}

/// Two parallel channels at y = 0.5 and y = 1.5, `n` points each at
/// x = 0.5, 1.5, ...
pub fn two_channels(n: usize) -> Discretization {
    let branches = vec![Branch::channel("upper", n as f64), Branch::channel("lower", n as f64)];
    let points = (0..2)
        .flat_map(|b| {
            (0..n).map(move |i| DiscretizationPoint {
                branch: BranchIndex(b),
                chainage: i as f64 + 0.5,
                coordinate: Coordinate::new(i as f64 + 0.5, b as f64 + 0.5),
            })
        })
        .collect();
    Discretization::new(branches, points).unwrap()
}
