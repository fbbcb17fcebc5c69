use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::BodyId;
use crate::core::bodies::{BodyProps, BodyShape, CollisionPair, PhysicsBodies};

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

impl BodyShape {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            BodyShape::Circle { radius } => ColliderBuilder::ball(radius),
            BodyShape::Rect { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        self.collisions
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        // Contact forces are not used but the trait requires this.
    }
}

struct TrackedBody {
    handle: RigidBodyHandle,
    label: String,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Rapier2D table simulation. Zero gravity (the table is seen from above).
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    tracked: HashMap<BodyId, TrackedBody>,
    next_id: u32,
}

impl PhysicsWorld {
    /// Create an empty world stepping `dt` seconds at a time.
    pub fn new(dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            gravity: vec2_to_na(Vec2::ZERO),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            tracked: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn insert(
        &mut self,
        label: &str,
        rb: RigidBody,
        collider: ColliderBuilder,
        props: BodyProps,
        sensor: bool,
    ) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let mut rb = rb;
        rb.user_data = id.0 as u128;
        let handle = self.bodies.insert(rb);

        let collider = collider
            .sensor(sensor)
            .restitution(props.restitution)
            .friction(props.friction)
            .density(props.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.tracked.insert(
            id,
            TrackedBody {
                handle,
                label: label.to_string(),
            },
        );
        id
    }

    fn collider_to_body(&self, collider_handle: ColliderHandle) -> Option<BodyId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(BodyId(body.user_data as u32))
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let handle = self.tracked.get(&id)?.handle;
        self.bodies.get_mut(handle)
    }

    fn body(&self, id: BodyId) -> Option<&RigidBody> {
        let handle = self.tracked.get(&id)?.handle;
        self.bodies.get(handle)
    }
}

impl PhysicsBodies for PhysicsWorld {
    fn create_circle_body(
        &mut self,
        label: &str,
        pos: Vec2,
        radius: f32,
        props: BodyProps,
    ) -> BodyId {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(pos))
            .linear_damping(props.linear_damping)
            .angular_damping(props.angular_damping)
            .ccd_enabled(true)
            .build();
        self.insert(label, rb, ColliderBuilder::ball(radius), props, false)
    }

    fn create_static_body(
        &mut self,
        label: &str,
        pos: Vec2,
        shape: BodyShape,
        sensor: bool,
        props: BodyProps,
    ) -> BodyId {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(pos))
            .build();
        self.insert(label, rb, shape.build_collider(), props, sensor)
    }

    fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(rb) = self.body_mut(id) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some(rb) = self.body_mut(id) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    fn remove_body(&mut self, id: BodyId) {
        let Some(tracked) = self.tracked.remove(&id) else {
            return;
        };
        self.bodies.remove(
            tracked.handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn set_enabled(&mut self, id: BodyId, enabled: bool) {
        if let Some(rb) = self.body_mut(id) {
            rb.set_enabled(enabled);
        }
    }

    // Rapier forces persist across steps, so a cue strike is an impulse.
    fn apply_force(&mut self, id: BodyId, origin: Vec2, force: Vec2) {
        if let Some(rb) = self.body_mut(id) {
            rb.apply_impulse_at_point(
                vec2_to_na(force),
                nalgebra::Point2::new(origin.x, origin.y),
                true,
            );
        }
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|rb| na_to_vec2(rb.translation()))
    }

    fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|rb| na_to_vec2(rb.linvel()))
    }

    fn step(&mut self, events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        // Only contact starts matter to the rules.
        for event in self.event_collector.drain_collisions() {
            let CollisionEvent::Started(h1, h2, _) = event else {
                continue;
            };
            let (Some(a), Some(b)) = (self.collider_to_body(h1), self.collider_to_body(h2)) else {
                continue;
            };
            let (Some(ta), Some(tb)) = (self.tracked.get(&a), self.tracked.get(&b)) else {
                continue;
            };
            events.push(CollisionPair::new(a, &ta.label, b, &tb.label));
        }
    }

    fn clear(&mut self) {
        let dt = self.integration_parameters.dt;
        let next_id = self.next_id;
        *self = Self::new(dt);
        // Ids stay unique across resets.
        self.next_id = next_id;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
