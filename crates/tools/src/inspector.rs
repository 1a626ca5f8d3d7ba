use seascape_scene::{Scene, SceneObject};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene for the CLI and the desktop overlay.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let objects = scene.objects();
        SceneSummary {
            time: objects.first().map_or(0.0, |o| o.material.time),
            object_count: objects.len(),
            vertex_count: scene.vertex_count(),
            triangle_count: objects.iter().map(|o| o.mesh.triangle_count()).sum(),
        }
    }

    /// Describe one object by name.
    pub fn inspect_object(scene: &Scene, name: &str) -> Option<ObjectInfo> {
        scene.object(name).map(ObjectInfo::from_object)
    }

    /// Names of all objects, in draw order.
    pub fn list_objects(scene: &Scene) -> Vec<&str> {
        scene.objects().iter().map(|o| o.name.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub time: f32,
    pub object_count: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: t={:.3} objects={} vertices={} triangles={}",
            self.time, self.object_count, self.vertex_count, self.triangle_count
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub name: String,
    pub vertices: usize,
    pub triangles: usize,
    /// Rest-pose bounds, `None` for an empty mesh.
    pub bounds: Option<([f32; 3], [f32; 3])>,
    pub small_iterations: u32,
}

impl ObjectInfo {
    fn from_object(object: &SceneObject) -> Self {
        Self {
            name: object.name.clone(),
            vertices: object.mesh.vertex_count(),
            triangles: object.mesh.triangle_count(),
            bounds: object
                .mesh
                .bounds()
                .map(|(lo, hi)| (lo.to_array(), hi.to_array())),
            small_iterations: object.material.waves.small_iterations,
        }
    }
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Object [{}] vertices={} triangles={} iterations={}",
            self.name, self.vertices, self.triangles, self.small_iterations
        )?;
        if let Some((lo, hi)) = self.bounds {
            write!(
                f,
                " bounds=({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
                lo[0], lo[1], lo[2], hi[0], hi[1], hi[2]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seascape_scene::{BlockFont, PlaneConfig, SceneConfig, TEXT, TextConfig, WATER};

    fn config(text: bool) -> SceneConfig {
        SceneConfig {
            plane: PlaneConfig {
                resolution: 8,
                ..PlaneConfig::default()
            },
            text: TextConfig {
                enabled: text,
                ..TextConfig::default()
            },
            ..SceneConfig::default()
        }
    }

    #[test]
    fn summary_stock_scene() {
        let scene = Scene::from_config(&config(true), &BlockFont);
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.object_count, 2);
        assert_eq!(summary.time, 0.0);
        assert!(summary.vertex_count > 81);
    }

    #[test]
    fn summary_tracks_time() {
        let mut scene = Scene::from_config(&config(false), &BlockFont);
        scene.set_time(2.5);
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.time, 2.5);
        assert_eq!(summary.object_count, 1);
        assert_eq!(summary.vertex_count, 81);
        assert_eq!(summary.triangle_count, 128);
    }

    #[test]
    fn inspect_water() {
        let scene = Scene::from_config(&config(true), &BlockFont);
        let info = SceneInspector::inspect_object(&scene, WATER).unwrap();
        assert_eq!(info.vertices, 81);
        let (lo, hi) = info.bounds.unwrap();
        assert_eq!(lo, [-1.0, 0.0, -1.5]);
        assert_eq!(hi, [1.0, 0.0, 1.5]);
    }

    #[test]
    fn inspect_missing_object() {
        let scene = Scene::from_config(&config(false), &BlockFont);
        assert!(SceneInspector::inspect_object(&scene, TEXT).is_none());
    }

    #[test]
    fn list_in_draw_order() {
        let scene = Scene::from_config(&config(true), &BlockFont);
        assert_eq!(SceneInspector::list_objects(&scene), vec![WATER, TEXT]);
    }

    #[test]
    fn summary_display() {
        let scene = Scene::from_config(&config(false), &BlockFont);
        let s = SceneInspector::summary(&scene).to_string();
        assert!(s.contains("objects=1"));
        assert!(s.contains("t=0.000"));
    }
}
