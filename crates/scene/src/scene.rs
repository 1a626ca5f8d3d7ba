use crate::config::SceneConfig;
use crate::geometry::{self, Mesh};
use crate::material::Material;
use crate::text::{self, GlyphSource};

pub const WATER: &str = "water";
pub const TEXT: &str = "text";

/// A mesh drawn with one material.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
}

/// Everything that gets drawn each frame.
///
/// Objects are kept in draw order. The render loop is the only caller of
/// [`Scene::set_time`]; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the water plane and, if enabled, the text line.
    ///
    /// Text that produces no geometry (disabled, empty, or every glyph missing
    /// from the font) leaves the text layer out; nothing else changes.
    pub fn from_config(config: &SceneConfig, font: &dyn GlyphSource) -> Self {
        let mut scene = Scene::new();

        let plane = &config.plane;
        let water = geometry::plane(plane.width, plane.depth, plane.resolution);
        tracing::info!(
            vertices = water.vertex_count(),
            triangles = water.triangle_count(),
            "water plane built"
        );
        scene.add(SceneObject {
            name: WATER.into(),
            mesh: water,
            material: Material::new(config.water.waves, config.water.colors),
        });

        if config.text.enabled {
            let mesh = text::layout(&config.text.content, &config.text.style, font);
            if mesh.is_empty() {
                tracing::warn!(
                    "text {:?} produced no geometry, text layer absent",
                    config.text.content
                );
            } else {
                let m = config.text.material;
                scene.add(SceneObject {
                    name: TEXT.into(),
                    mesh,
                    material: Material::new(m.waves, m.colors),
                });
            }
        }

        scene
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.objects.iter().map(|o| &o.material)
    }

    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.objects.iter_mut().map(|o| &mut o.material)
    }

    /// Write the time uniform of every material.
    pub fn set_time(&mut self, t: f32) {
        for m in self.materials_mut() {
            m.time = t;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.vertex_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlaneConfig, TextConfig};
    use crate::text::BlockFont;

    fn small_config() -> SceneConfig {
        SceneConfig {
            plane: PlaneConfig {
                resolution: 8,
                ..PlaneConfig::default()
            },
            ..SceneConfig::default()
        }
    }

    #[test]
    fn stock_scene_has_water_and_text() {
        let scene = Scene::from_config(&small_config(), &BlockFont);
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.objects()[0].name, WATER);
        assert_eq!(scene.object(WATER).unwrap().mesh.vertex_count(), 81);
        assert!(scene.object(TEXT).is_some());
    }

    #[test]
    fn materials_are_independent() {
        let scene = Scene::from_config(&small_config(), &BlockFont);
        let water = scene.object(WATER).unwrap().material;
        let text = scene.object(TEXT).unwrap().material;
        assert_eq!(water, Material::water());
        assert_eq!(text, Material::text());
    }

    #[test]
    fn set_time_reaches_every_material() {
        let mut scene = Scene::from_config(&small_config(), &BlockFont);
        scene.set_time(3.5);
        assert!(scene.materials().all(|m| m.time == 3.5));
    }

    #[test]
    fn disabled_or_unrenderable_text_is_absent() {
        let mut config = small_config();
        config.text.enabled = false;
        assert!(Scene::from_config(&config, &BlockFont).object(TEXT).is_none());

        config.text = TextConfig {
            content: "€€".into(),
            ..TextConfig::default()
        };
        let scene = Scene::from_config(&config, &BlockFont);
        assert!(scene.object(TEXT).is_none());
        assert!(scene.object(WATER).is_some());
    }

    #[test]
    fn object_mut_edits_in_place() {
        let mut scene = Scene::from_config(&small_config(), &BlockFont);
        scene.object_mut(WATER).unwrap().material.waves.small_iterations = 3;
        let iterations = |name: &str| scene.object(name).unwrap().material.waves.small_iterations;
        assert_eq!(iterations(WATER), 3);
        assert_eq!(iterations(TEXT), 1);
    }
}
