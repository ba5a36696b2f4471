//! Render extract: ECS → host render adapter
//!
//! Симуляция ничего не рисует. Каждый кадр (PostUpdate) собирается RenderQueue -
//! список «нарисуй куб с этим transform и этим материалом». Host передаёт
//! свой RenderSink в `RenderQueue::submit`.

use bevy::prelude::*;

use crate::components::Body;

/// Материал (цвет) тела
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialHandle {
    Archer,
    Target,
    Ground,
    Tower,
    Projectile,
    /// Замороженный снаряд во время взрыва
    Explosion,
}

impl MaterialHandle {
    pub fn color_hex(&self) -> &'static str {
        match self {
            MaterialHandle::Archer => "#ff0000",
            MaterialHandle::Target => "#00ff00",
            MaterialHandle::Ground => "#964b00",
            MaterialHandle::Tower => "#808080",
            MaterialHandle::Projectile => "#0000ff",
            MaterialHandle::Explosion => "#ff8c00",
        }
    }
}

/// Один draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    pub entity: Entity,
    pub transform: Mat4,
    pub material: MaterialHandle,
}

/// translation(x, y, 0) · scale(scale, scale, zscale)
pub fn body_transform(body: &Body) -> Mat4 {
    Mat4::from_translation(Vec3::new(body.x, body.y, 0.0))
        * Mat4::from_scale(Vec3::new(body.scale, body.scale, body.zscale))
}

/// Render adapter (реализуется host'ом)
pub trait RenderSink {
    fn draw_primitive(&mut self, transform: &Mat4, material: MaterialHandle);
}

/// Renderables текущего кадра (пересобирается каждый кадр)
#[derive(Resource, Debug, Default)]
pub struct RenderQueue {
    items: Vec<Renderable>,
}

impl RenderQueue {
    pub fn items(&self) -> &[Renderable] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Отдать все draw calls в sink (порядок стабилен: по Entity index)
    pub fn submit(&self, sink: &mut dyn RenderSink) {
        for item in &self.items {
            sink.draw_primitive(&item.transform, item.material);
        }
    }
}

/// Система: собрать RenderQueue из всех тел с материалом
pub fn extract_renderables(mut queue: ResMut<RenderQueue>, bodies: Query<(Entity, &Body, &MaterialHandle)>) {
    queue.items.clear();
    queue.items.extend(bodies.iter().map(|(entity, body, material)| Renderable {
        entity,
        transform: body_transform(body),
        material: *material,
    }));
    queue.items.sort_by_key(|item| item.entity.index());
}

/// Render Extract Plugin
pub struct RenderExtractPlugin;

impl Plugin for RenderExtractPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderQueue>()
            .add_systems(PostUpdate, extract_renderables);
    }
}
