//! List-view configuration for the management console.
//!
//! Each registered model names the fields shown as columns. The site is
//! validated against the schema registry when it is built, so a typo in a
//! field name fails startup instead of a request.

use common::{
    ActivityFilter, ChangeListDto, LeaderboardFilter, Pagination, TeamFilter, UserFilter,
    WorkoutFilter,
};
use model::schema::{EntityKind, FieldDef, FieldKind, SchemaRegistry};
use model::store::{activities, leaderboard, teams, users, workouts};
use model::{Result, StoreError, wire};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, instrument, trace};

/// Shown for empty values.
const EMPTY_VALUE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAdmin {
    pub entity: EntityKind,
    pub list_display: &'static [&'static str],
}

pub const DEFAULT_ADMINS: &[ModelAdmin] = &[
    ModelAdmin { entity: EntityKind::User, list_display: &["username", "email", "bio"] },
    ModelAdmin { entity: EntityKind::Team, list_display: &["name", "description"] },
    ModelAdmin {
        entity: EntityKind::Activity,
        list_display: &["user", "activity_type", "duration", "date", "calories_burned"],
    },
    ModelAdmin { entity: EntityKind::Workout, list_display: &["name", "description"] },
    ModelAdmin { entity: EntityKind::LeaderboardEntry, list_display: &["user", "score", "team"] },
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AdminConfigError {
    #[error("{entity} is not in the schema registry")]
    UnknownEntity { entity: EntityKind },

    #[error("{entity} has no field '{field}'")]
    UnknownField { entity: EntityKind, field: String },

    #[error("{entity}.{field} cannot be displayed")]
    HiddenField { entity: EntityKind, field: String },

    #[error("{0} is registered more than once")]
    DuplicateRegistration(EntityKind),
}

/// Validated list views, one per registered entity.
#[derive(Debug, Clone)]
pub struct AdminSite {
    views: BTreeMap<EntityKind, Vec<FieldDef>>,
}

impl AdminSite {
    pub fn new(
        registry: &SchemaRegistry,
        admins: &[ModelAdmin],
    ) -> std::result::Result<Self, AdminConfigError> {
        let mut views = BTreeMap::new();

        for admin in admins {
            let schema = registry
                .entity(admin.entity)
                .ok_or(AdminConfigError::UnknownEntity { entity: admin.entity })?;

            let mut fields = Vec::with_capacity(admin.list_display.len());
            for name in admin.list_display {
                let field = schema.field(name).ok_or_else(|| AdminConfigError::UnknownField {
                    entity: admin.entity,
                    field: name.to_string(),
                })?;
                if !field.on_wire() {
                    return Err(AdminConfigError::HiddenField {
                        entity: admin.entity,
                        field: name.to_string(),
                    });
                }
                fields.push(*field);
            }

            if views.insert(admin.entity, fields).is_some() {
                return Err(AdminConfigError::DuplicateRegistration(admin.entity));
            }
        }

        Ok(Self { views })
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Registered entities in a stable order.
    pub fn entities(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.views.keys().copied()
    }

    pub fn columns(&self, entity: EntityKind) -> Option<Vec<&'static str>> {
        self.views
            .get(&entity)
            .map(|fields| fields.iter().map(|field| field.name).collect())
    }

    /// Render one page of `entity` as a table. `None` if the entity has no
    /// registered list view.
    #[instrument(skip(self, db))]
    pub async fn changelist(
        &self,
        db: &DatabaseConnection,
        entity: EntityKind,
        page: &Pagination,
    ) -> Result<Option<ChangeListDto>> {
        let Some(fields) = self.views.get(&entity) else {
            return Ok(None);
        };

        let records = load_records(db, entity, page).await?;
        trace!("Rendering {} {} rows", records.len(), entity);

        let rows = records
            .iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| render_cell(field, &record[field.name]))
                    .collect()
            })
            .collect::<Vec<Vec<String>>>();
        debug!("Rendered change list for {} with {} rows", entity, rows.len());

        Ok(Some(ChangeListDto {
            entity: entity.resource().to_string(),
            columns: fields.iter().map(|field| field.name.to_string()).collect(),
            rows,
        }))
    }
}

fn to_values<T: Serialize>(items: Vec<T>) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| {
            serde_json::to_value(item)
                .map_err(|err| StoreError::Integrity(format!("Failed to render record: {}", err)))
        })
        .collect()
}

/// Wire representations of one page, in each entity's listing order.
async fn load_records(
    db: &DatabaseConnection,
    entity: EntityKind,
    page: &Pagination,
) -> Result<Vec<Value>> {
    match entity {
        EntityKind::User => {
            let models = users::list(db, &UserFilter::default(), page).await?;
            to_values(models.into_iter().map(common::UserDto::from).collect())
        }
        EntityKind::Team => {
            let models = teams::list(db, &TeamFilter::default(), page).await?;
            to_values(wire::teams(db, models).await?)
        }
        EntityKind::Activity => {
            let models = activities::list(db, &ActivityFilter::default(), page).await?;
            to_values(wire::activities(db, models).await?)
        }
        EntityKind::Workout => {
            let models = workouts::list(db, &WorkoutFilter::default(), page).await?;
            to_values(wire::workouts(db, models).await?)
        }
        EntityKind::LeaderboardEntry => {
            let models = leaderboard::list(db, &LeaderboardFilter::default(), page).await?;
            to_values(wire::leaderboard_entries(db, models).await?)
        }
    }
}

/// The label a related record is displayed by.
fn label_field(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::User => "username",
        EntityKind::Team | EntityKind::Workout => "name",
        EntityKind::Activity | EntityKind::LeaderboardEntry => "id",
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_VALUE.to_string(),
        Value::String(s) if s.is_empty() => EMPTY_VALUE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_cell(field: &FieldDef, value: &Value) -> String {
    match field.kind {
        FieldKind::ForeignKey(target) => match value {
            Value::Null => EMPTY_VALUE.to_string(),
            related => scalar(&related[label_field(target)]),
        },
        FieldKind::ManyToMany(target) => {
            let labels: Vec<String> = value
                .as_array()
                .map(|items| items.iter().map(|item| scalar(&item[label_field(target)])).collect())
                .unwrap_or_default();
            if labels.is_empty() {
                EMPTY_VALUE.to_string()
            } else {
                labels.join(", ")
            }
        }
        _ => scalar(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use common::{
        CreateActivityRequest, CreateLeaderboardEntryRequest, CreateTeamRequest, CreateUserRequest,
    };
    use serde_json::json;

    fn site() -> AdminSite {
        AdminSite::new(&SchemaRegistry::new(), DEFAULT_ADMINS).unwrap()
    }

    #[test]
    fn test_default_admins_are_valid() {
        let site = site();

        assert_eq!(site.len(), 5);
        assert_eq!(site.entities().collect::<Vec<_>>(), EntityKind::ALL.to_vec());
        assert_eq!(
            site.columns(EntityKind::Activity).unwrap(),
            vec!["user", "activity_type", "duration", "date", "calories_burned"]
        );
        assert_eq!(
            site.columns(EntityKind::LeaderboardEntry).unwrap(),
            vec!["user", "score", "team"]
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let admins = [ModelAdmin { entity: EntityKind::Team, list_display: &["name", "motto"] }];

        let err = AdminSite::new(&SchemaRegistry::new(), &admins).unwrap_err();
        assert_eq!(
            err,
            AdminConfigError::UnknownField { entity: EntityKind::Team, field: "motto".to_string() }
        );
    }

    #[test]
    fn test_password_cannot_be_displayed() {
        let admins = [ModelAdmin {
            entity: EntityKind::User,
            list_display: &["username", "password"],
        }];

        let err = AdminSite::new(&SchemaRegistry::new(), &admins).unwrap_err();
        assert!(matches!(err, AdminConfigError::HiddenField { .. }));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let admins = [
            ModelAdmin { entity: EntityKind::Workout, list_display: &["name"] },
            ModelAdmin { entity: EntityKind::Workout, list_display: &["description"] },
        ];

        let err = AdminSite::new(&SchemaRegistry::new(), &admins).unwrap_err();
        assert_eq!(err, AdminConfigError::DuplicateRegistration(EntityKind::Workout));
    }

    #[test]
    fn test_render_cell() {
        let registry = SchemaRegistry::new();
        let team = registry.field(EntityKind::LeaderboardEntry, "team").unwrap();
        let members = registry.field(EntityKind::Team, "members").unwrap();
        let bio = registry.field(EntityKind::User, "bio").unwrap();

        assert_eq!(render_cell(team, &Value::Null), "-");
        assert_eq!(render_cell(team, &json!({"id": 1, "name": "DC"})), "DC");
        assert_eq!(
            render_cell(members, &json!([{"username": "Batman"}, {"username": "Superman"}])),
            "Batman, Superman"
        );
        assert_eq!(render_cell(members, &json!([])), "-");
        assert_eq!(render_cell(bio, &Value::Null), "-");
    }

    #[tokio::test]
    async fn test_changelist_renders_related_labels() {
        let db = setup_test_db().await;
        let bruce = users::create(
            &db,
            CreateUserRequest {
                username: Some("Batman".to_string()),
                email: Some("batman@dc.com".to_string()),
                password: Some("password".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let dc = teams::create(
            &db,
            CreateTeamRequest {
                name: Some("DC".to_string()),
                description: None,
                member_ids: Some(vec![bruce.id]),
            },
        )
        .await
        .unwrap();
        leaderboard::create(
            &db,
            CreateLeaderboardEntryRequest {
                user_id: Some(bruce.id),
                score: Some(100),
                team_id: Some(dc.id),
            },
        )
        .await
        .unwrap();
        activities::create(
            &db,
            CreateActivityRequest {
                user_id: Some(bruce.id),
                activity_type: Some("Running".to_string()),
                duration: Some(30),
                calories_burned: Some(300),
            },
        )
        .await
        .unwrap();

        let site = site();
        let page = Pagination::default();

        let board = site
            .changelist(&db, EntityKind::LeaderboardEntry, &page)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(board.entity, "leaderboard");
        assert_eq!(board.rows, vec![vec!["Batman", "100", "DC"]]);

        let users_view = site.changelist(&db, EntityKind::User, &page).await.unwrap().unwrap();
        assert_eq!(users_view.rows, vec![vec!["Batman", "batman@dc.com", "-"]]);

        let activity_view = site
            .changelist(&db, EntityKind::Activity, &page)
            .await
            .unwrap()
            .unwrap();
        let row = &activity_view.rows[0];
        assert_eq!(row[0], "Batman");
        assert_eq!(row[1], "Running");
        assert_eq!(row[2], "30");
        assert!(row[3].parse::<chrono::DateTime<chrono::Utc>>().is_ok());
        assert_eq!(row[4], "300");
    }

    #[tokio::test]
    async fn test_unregistered_entity_has_no_changelist() {
        let db = setup_test_db().await;
        let admins = [ModelAdmin { entity: EntityKind::User, list_display: &["username"] }];
        let site = AdminSite::new(&SchemaRegistry::new(), &admins).unwrap();

        let view = site.changelist(&db, EntityKind::Team, &Pagination::default()).await.unwrap();
        assert!(view.is_none());
    }
}
