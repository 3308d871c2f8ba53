//! Demo orchestration layer.
//!
//! [`Engine`] owns the mesh, camera, and buffers and drives one frame through
//! the core: world/view transform and frustum clipping here, then
//! [`crate::pipeline::run`] (triangle setup + attribute preparation) and
//! [`crate::raster::render`] (block rasterization) for the rest.

use crate::batch::{AttributeFlags, TriangleBatch};
use crate::buffers::{ColorBuffer, DepthBuffer};
use crate::camera::FpsCamera;
use crate::clipping::{ClipPolygon, ClipVertex, Frustum};
use crate::colors;
use crate::mesh::{LoadError, Mesh};
use crate::pipeline;
use crate::prelude::{Mat4, Vec2, Vec3, Vec4};
use crate::projection::Projection;
use crate::raster;
use crate::texture::Texture;

fn solid_white_texture() -> Texture {
    Texture::from_texels(1, 1, vec![0xFFFFFFFF])
}

pub struct Engine {
    mesh: Mesh,
    camera: FpsCamera,
    projection: Projection,
    frustum: Frustum,
    color: ColorBuffer,
    depth: DepthBuffer,
    texture: Texture,
    /// Scratch batch of view-space triangles, rebuilt every [`Engine::update`].
    view_batch: TriangleBatch,
    pub backface_culling: bool,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Self {
        let fov_y: f32 = 45.0_f32.to_radians();
        let aspect_ratio = width as f32 / height as f32;
        let z_near = 0.1;
        let z_far = 100.0;
        let projection = Projection::new(fov_y, aspect_ratio, z_near, z_far);

        Self {
            mesh: Mesh::cube(),
            camera: FpsCamera::new(Vec3::new(0.0, 0.0, -5.0)),
            frustum: projection.view_frustum(),
            projection,
            color: ColorBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
            texture: solid_white_texture(),
            view_batch: TriangleBatch::with_capacity(64),
            backface_culling: true,
        }
    }

    pub fn load_mesh(&mut self, file_path: &str) -> Result<(), LoadError> {
        self.mesh = Mesh::from_obj(file_path)?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.color.resize(width, height);
        self.depth.resize(width, height);
        self.projection.set_aspect_ratio(width as f32 / height as f32);
        self.frustum = self.projection.view_frustum();
    }

    pub fn camera(&self) -> &FpsCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FpsCamera {
        &mut self.camera
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera.set_position(position);
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera.position()
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Returns the rendered frame as bytes (ARGB8888 format).
    pub fn frame_buffer(&self) -> &[u8] {
        self.color.as_bytes()
    }

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = texture;
    }

    pub fn clear_texture(&mut self) {
        self.texture = solid_white_texture();
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Transform the mesh into view space, cull, and clip against the
    /// frustum. Populates `view_batch` with triangles ready for the
    /// pipeline driver's modelview-projection multiply.
    pub fn update(&mut self) {
        self.view_batch.clear();

        let rotation = self.mesh.rotation();
        let translation = self.mesh.translation();
        let scale = self.mesh.scale();
        let camera_position = self.camera.position();
        let view_matrix = self.camera.view_matrix();

        let world_matrix = Mat4::translation(translation.x, translation.y, translation.z)
            * Mat4::rotation_x(rotation.x)
            * Mat4::rotation_y(rotation.y)
            * Mat4::rotation_z(rotation.z)
            * Mat4::scaling(scale.x, scale.y, scale.z);

        let vertices = self.mesh.vertices();
        for face in self.mesh.faces() {
            let face_vertices = [
                vertices[face.a as usize],
                vertices[face.b as usize],
                vertices[face.c as usize],
            ];

            let world_positions = [
                world_matrix * face_vertices[0].position,
                world_matrix * face_vertices[1].position,
                world_matrix * face_vertices[2].position,
            ];

            let face_normal =
                (world_positions[1] - world_positions[0]).cross(world_positions[2] - world_positions[0]);

            if self.backface_culling {
                let camera_ray = camera_position - world_positions[0];
                if face_normal.dot(camera_ray) < 0.0 {
                    continue;
                }
            }

            let view_positions = [
                view_matrix * world_positions[0],
                view_matrix * world_positions[1],
                view_matrix * world_positions[2],
            ];

            let clip_vertices = [
                ClipVertex::new(view_positions[0], face_vertices[0].texel, colors::FILL),
                ClipVertex::new(view_positions[1], face_vertices[1].texel, colors::FILL),
                ClipVertex::new(view_positions[2], face_vertices[2].texel, colors::FILL),
            ];

            let polygon =
                ClipPolygon::from_triangle(clip_vertices[0], clip_vertices[1], clip_vertices[2]);
            let clipped = self.frustum.clip_polygon(polygon);
            if clipped.is_empty() {
                continue;
            }

            for (v0, v1, v2) in clipped.triangulate() {
                self.view_batch.push(
                    [
                        Vec4::new(v0.position.x, v0.position.y, v0.position.z, 1.0),
                        Vec4::new(v1.position.x, v1.position.y, v1.position.z, 1.0),
                        Vec4::new(v2.position.x, v2.position.y, v2.position.z, 1.0),
                    ],
                    [v0.texcoord, v1.texcoord, v2.texcoord],
                    [Vec2::ZERO; 3],
                    [Vec3::ZERO; 3],
                    [Vec4::ONE; 3],
                );
            }
        }
    }

    /// Render the current frame: clear, run the pipeline driver, then the
    /// block rasterizer.
    pub fn render(&mut self) {
        self.color.clear(colors::BACKGROUND);
        self.depth.clear();

        let projection_matrix = self.projection.matrix();
        let coeff_batch = pipeline::run(
            &self.view_batch,
            &projection_matrix,
            AttributeFlags::TEXCOORD0,
            self.color.width(),
            self.color.height(),
        );

        raster::render(
            &coeff_batch,
            AttributeFlags::TEXCOORD0,
            &self.texture,
            &mut self.color,
            &mut self.depth,
        );
    }
}
