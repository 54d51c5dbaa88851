//! Runtime description of every entity shape.
//!
//! The registry is built once at startup and handed to whatever needs to
//! reason about field names (the admin site validates its list views
//! against it). Nothing registers itself globally.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    User,
    Team,
    Activity,
    Workout,
    LeaderboardEntry,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::User,
        EntityKind::Team,
        EntityKind::Activity,
        EntityKind::Workout,
        EntityKind::LeaderboardEntry,
    ];

    /// Model name as used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Team => "Team",
            EntityKind::Activity => "Activity",
            EntityKind::Workout => "Workout",
            EntityKind::LeaderboardEntry => "LeaderboardEntry",
        }
    }

    /// Path segment of the REST resource.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Team => "teams",
            EntityKind::Activity => "activities",
            EntityKind::Workout => "workouts",
            EntityKind::LeaderboardEntry => "leaderboard",
        }
    }

    pub fn from_resource(resource: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.resource() == resource)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Email,
    Url,
    Integer,
    DateTime,
    /// Stored hashed, never serialized
    Password,
    ForeignKey(EntityKind),
    ManyToMany(EntityKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldDef {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, nullable: false }
    }

    const fn nullable(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, nullable: true }
    }

    /// Whether the field appears in the wire representation.
    pub fn on_wire(&self) -> bool {
        self.kind != FieldKind::Password
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field names of the wire representation, in declaration order.
    pub fn wire_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.on_wire())
            .map(|field| field.name)
    }
}

const USER_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Id),
    FieldDef::new("username", FieldKind::Text),
    FieldDef::new("email", FieldKind::Email),
    FieldDef::nullable("bio", FieldKind::Text),
    FieldDef::nullable("avatar", FieldKind::Url),
    FieldDef::new("password", FieldKind::Password),
];

const TEAM_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Id),
    FieldDef::new("name", FieldKind::Text),
    FieldDef::nullable("description", FieldKind::Text),
    FieldDef::new("members", FieldKind::ManyToMany(EntityKind::User)),
];

const ACTIVITY_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Id),
    FieldDef::new("user", FieldKind::ForeignKey(EntityKind::User)),
    FieldDef::new("activity_type", FieldKind::Text),
    FieldDef::new("duration", FieldKind::Integer),
    FieldDef::new("date", FieldKind::DateTime),
    FieldDef::new("calories_burned", FieldKind::Integer),
];

const WORKOUT_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Id),
    FieldDef::new("name", FieldKind::Text),
    FieldDef::nullable("description", FieldKind::Text),
    FieldDef::new("suggested_for", FieldKind::ManyToMany(EntityKind::User)),
];

const LEADERBOARD_ENTRY_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldKind::Id),
    FieldDef::new("user", FieldKind::ForeignKey(EntityKind::User)),
    FieldDef::new("score", FieldKind::Integer),
    FieldDef::nullable("team", FieldKind::ForeignKey(EntityKind::Team)),
];

/// Every entity shape available at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    entities: Vec<EntitySchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let entities = vec![
            EntitySchema { kind: EntityKind::User, table: "users", fields: USER_FIELDS },
            EntitySchema { kind: EntityKind::Team, table: "teams", fields: TEAM_FIELDS },
            EntitySchema {
                kind: EntityKind::Activity,
                table: "activities",
                fields: ACTIVITY_FIELDS,
            },
            EntitySchema { kind: EntityKind::Workout, table: "workouts", fields: WORKOUT_FIELDS },
            EntitySchema {
                kind: EntityKind::LeaderboardEntry,
                table: "leaderboard_entries",
                fields: LEADERBOARD_ENTRY_FIELDS,
            },
        ];
        Self { entities }
    }

    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    pub fn entity(&self, kind: EntityKind) -> Option<&EntitySchema> {
        self.entities.iter().find(|schema| schema.kind == kind)
    }

    pub fn field(&self, kind: EntityKind, name: &str) -> Option<&FieldDef> {
        self.entity(kind).and_then(|schema| schema.field(name))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::prelude::*;
    use sea_orm::EntityName;

    #[test]
    fn test_registry_tables_match_entities() {
        let registry = SchemaRegistry::new();
        let table = |kind| registry.entity(kind).map(|schema| schema.table);

        assert_eq!(table(EntityKind::User), Some(User.table_name()));
        assert_eq!(table(EntityKind::Team), Some(Team.table_name()));
        assert_eq!(table(EntityKind::Activity), Some(Activity.table_name()));
        assert_eq!(table(EntityKind::Workout), Some(Workout.table_name()));
        assert_eq!(
            table(EntityKind::LeaderboardEntry),
            Some(LeaderboardEntry.table_name())
        );
    }

    #[test]
    fn test_password_is_not_on_wire() {
        let registry = SchemaRegistry::new();
        let user = registry.entity(EntityKind::User).unwrap();

        let wire: Vec<_> = user.wire_fields().collect();
        assert_eq!(wire, vec!["id", "username", "email", "bio", "avatar"]);
        assert!(user.field("password").is_some());
    }

    #[test]
    fn test_resource_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_resource(kind.resource()), Some(kind));
        }
        assert_eq!(EntityKind::from_resource("tags"), None);
    }

    #[test]
    fn test_relationship_fields() {
        let registry = SchemaRegistry::new();

        assert_eq!(
            registry.field(EntityKind::Team, "members").map(|f| f.kind),
            Some(FieldKind::ManyToMany(EntityKind::User))
        );
        let team = registry.field(EntityKind::LeaderboardEntry, "team").unwrap();
        assert_eq!(team.kind, FieldKind::ForeignKey(EntityKind::Team));
        assert!(team.nullable);
        assert!(registry.field(EntityKind::Workout, "members").is_none());
    }
}
