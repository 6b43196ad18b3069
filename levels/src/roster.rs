//! Compile-time set of houses the player can place.

use pigpen_core::{EntityId, Shape, WorldPosition};

/// Static description of a placeable house.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityTemplate {
    id: EntityId,
    shape: Shape,
    home: WorldPosition,
}

impl EntityTemplate {
    /// Creates a new template from its parts.
    #[must_use]
    pub fn new(id: EntityId, shape: Shape, home: WorldPosition) -> Self {
        Self { id, shape, home }
    }

    /// Identifier of the house.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Cells covered by the house relative to its anchor.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Off-board position the house rests at when a level starts.
    #[must_use]
    pub fn home(&self) -> WorldPosition {
        self.home
    }
}

/// Ordered collection of house templates.
#[derive(Clone, Debug, PartialEq)]
pub struct Roster {
    templates: Vec<EntityTemplate>,
}

impl Roster {
    /// Creates a roster from the provided templates, keeping their order.
    #[must_use]
    pub fn new(templates: Vec<EntityTemplate>) -> Self {
        Self { templates }
    }

    /// The red, yellow and brown houses.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            house("red", &[&[1, 2], &[0, 1], &[0, 1]], -5.0, 0.0),
            house("yellow", &[&[1, 2], &[0, 1]], 5.0, 0.0),
            house("brown", &[&[1, 2, 1]], 3.0, -2.5),
        ])
    }

    /// Template registered under `id`, if any.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&EntityTemplate> {
        self.templates.iter().find(|template| template.id() == id)
    }

    /// Reports whether `id` names a house in the roster.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Iterator over the templates in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityTemplate> {
        self.templates.iter()
    }

    /// Number of houses in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Reports whether the roster holds no houses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::standard()
    }
}

const HOME_HEIGHT: f32 = 0.1;

fn house(id: &str, markers: &[&[u8]], x: f32, z: f32) -> EntityTemplate {
    let shape = Shape::from_markers(markers).expect("standard house shapes are well formed");
    EntityTemplate::new(
        EntityId::new(id),
        shape,
        WorldPosition::new(x, HOME_HEIGHT, z),
    )
}
