//! Department employees, product components, components and attachments.

mod common;

use common::TestDb;
use directory::{
    dto::{
        attachments::AttachRequest,
        components::{ComponentListQuery, CreateComponentRequest, UpdateComponentRequest},
        departments::{CreateDepartmentRequest, DepartmentEmployeesRequest, UpdateDepartmentRequest},
        products::{CreateProductRequest, ProductComponentsRequest},
        teams::{CreateTeamRequest, TeamListQuery},
        ListQuery,
    },
    AttachmentOwner,
};
use entity::{AdditionalFields, Employees};
use sea_orm::{EntityTrait, PaginatorTrait};

fn component(name: &str, owner_id: Option<i32>, second_owner_id: Option<i32>) -> CreateComponentRequest {
    CreateComponentRequest {
        name: name.to_string(),
        component_type: "service".to_string(),
        owner_id,
        second_owner_id,
        ..Default::default()
    }
}

fn attach(name: &str) -> AttachRequest {
    AttachRequest {
        name:        name.to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn test_department_employees() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let e1 = db.employee("One").await;
    let e2 = db.employee("Two").await;
    let e3 = db.employee("Three").await;

    let eng = dir
        .create_department(
            &admin,
            CreateDepartmentRequest {
                name: "Eng".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    dir.add_department_employees(
        &admin,
        eng.id,
        DepartmentEmployeesRequest {
            employee_ids: vec![e1.id, e2.id],
        },
    )
    .await
    .unwrap();
    assert_eq!(dir.get_department(&admin, eng.id).await.unwrap().employee_count, 2);

    let err = dir
        .remove_department_employees(
            &admin,
            eng.id,
            DepartmentEmployeesRequest {
                employee_ids: vec![e1.id, e3.id],
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.message().contains(&e3.id.to_string()));
    assert_eq!(dir.get_department(&admin, eng.id).await.unwrap().employee_count, 2);

    dir.remove_department_employees(
        &admin,
        eng.id,
        DepartmentEmployeesRequest {
            employee_ids: vec![e1.id],
        },
    )
    .await
    .unwrap();
    let members = dir
        .list_department_employees(&admin, eng.id, &ListQuery::new())
        .await
        .unwrap();
    assert_eq!(members.items.iter().map(|e| e.id).collect::<Vec<_>>(), vec![e2.id]);
}

#[tokio::test]
async fn test_department_owner_joins_department() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let owner = db.employee("Owner").await;

    let eng = dir
        .create_department(
            &admin,
            CreateDepartmentRequest {
                name: "Eng".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = dir
        .update_department(
            &admin,
            eng.id,
            UpdateDepartmentRequest {
                owner_id: Some(Some(owner.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.owner_id, Some(owner.id));
    assert_eq!(updated.employee_count, 1);

    let stored = Employees::find_by_id(owner.id).one(&db.conn).await.unwrap().unwrap();
    assert_eq!(stored.department_id, Some(eng.id));
}

#[tokio::test]
async fn test_deleting_department_releases_employees() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let e = db.employee("Member").await;

    let eng = dir
        .create_department(
            &admin,
            CreateDepartmentRequest {
                name: "Eng".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    dir.add_department_employees(
        &admin,
        eng.id,
        DepartmentEmployeesRequest {
            employee_ids: vec![e.id],
        },
    )
    .await
    .unwrap();
    dir.add_additional_field(&admin, AttachmentOwner::Department(eng.id), attach("Budget"))
        .await
        .unwrap();

    dir.delete_department(&admin, eng.id).await.unwrap();

    let stored = Employees::find_by_id(e.id).one(&db.conn).await.unwrap().unwrap();
    assert_eq!(stored.department_id, None);
    assert_eq!(AdditionalFields::find().count(&db.conn).await.unwrap(), 0);
}

#[tokio::test]
async fn test_department_search() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;

    for (name, description) in [("Eng", "Builds things"), ("Sales", "Sells things"), ("HR", "100% people")] {
        dir.create_department(
            &admin,
            CreateDepartmentRequest {
                name: name.into(),
                description: description.into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let found = dir
        .list_departments(&admin, &ListQuery::new().with_search("sell"))
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].name, "Sales");

    // Wildcards in the search text match literally
    let percent = dir
        .list_departments(&admin, &ListQuery::new().with_search("%"))
        .await
        .unwrap();
    assert_eq!(percent.items.len(), 1);
    assert_eq!(percent.items[0].name, "HR");
}

#[tokio::test]
async fn test_component_owners_must_differ() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let a = db.employee("A").await;
    let b = db.employee("B").await;

    let err = dir
        .create_component(&admin, component("Gateway", Some(a.id), Some(a.id)))
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "second_owner_id");

    let gateway = dir
        .create_component(&admin, component("Gateway", Some(a.id), Some(b.id)))
        .await
        .unwrap();

    // The merged state is checked: new second owner equals the current owner
    let err = dir
        .update_component(
            &admin,
            gateway.id,
            UpdateComponentRequest {
                second_owner_id: Some(Some(a.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let swapped = dir
        .update_component(
            &admin,
            gateway.id,
            UpdateComponentRequest {
                owner_id: Some(Some(b.id)),
                second_owner_id: Some(Some(a.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(swapped.owner_id, Some(b.id));
    assert_eq!(swapped.second_owner_id, Some(a.id));
}

#[tokio::test]
async fn test_component_link_must_be_a_url() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let gateway = dir
        .create_component(&admin, component("Gateway", None, None))
        .await
        .unwrap();

    let err = dir
        .update_component(
            &admin,
            gateway.id,
            UpdateComponentRequest {
                link: Some(Some("not a url".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "link");

    let updated = dir
        .update_component(
            &admin,
            gateway.id,
            UpdateComponentRequest {
                link: Some(Some("https://docs.example.com/gateway".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.link.as_deref(), Some("https://docs.example.com/gateway"));
}

#[tokio::test]
async fn test_component_search_covers_owner_name() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let owner = db.employee("Svetlana Kuznetsova").await;

    dir.create_component(&admin, component("Gateway", Some(owner.id), None))
        .await
        .unwrap();
    dir.create_component(&admin, component("Ledger", None, None))
        .await
        .unwrap();

    let found = dir
        .list_components(
            &admin,
            &ComponentListQuery {
                list:           ListQuery::new().with_search("kuznetsova"),
                component_type: Some("service".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].name, "Gateway");
}

#[tokio::test]
async fn test_product_components_and_teams() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;

    let product = dir
        .create_product(
            &admin,
            CreateProductRequest {
                name: "Payments".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let gateway = dir.create_component(&admin, component("Gateway", None, None)).await.unwrap();
    let ledger = dir.create_component(&admin, component("Ledger", None, None)).await.unwrap();

    let err = dir
        .add_product_components(
            &admin,
            product.id,
            ProductComponentsRequest {
                component_ids: vec![gateway.id, 555],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    dir.add_product_components(
        &admin,
        product.id,
        ProductComponentsRequest {
            component_ids: vec![gateway.id, ledger.id],
        },
    )
    .await
    .unwrap();
    // Linking again is harmless
    dir.add_product_components(
        &admin,
        product.id,
        ProductComponentsRequest {
            component_ids: vec![gateway.id],
        },
    )
    .await
    .unwrap();

    let linked = dir
        .list_product_components(&admin, product.id, &ListQuery::new())
        .await
        .unwrap();
    assert_eq!(linked.pagination.total, 2);

    dir.remove_product_components(
        &admin,
        product.id,
        ProductComponentsRequest {
            component_ids: vec![gateway.id],
        },
    )
    .await
    .unwrap();
    let linked = dir
        .list_product_components(&admin, product.id, &ListQuery::new())
        .await
        .unwrap();
    assert_eq!(linked.items.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ledger.id]);

    let team = dir
        .create_team(
            &admin,
            CreateTeamRequest {
                name: "Payments Core".into(),
                manager_id: None,
                product_id: Some(product.id),
            },
        )
        .await
        .unwrap();
    let teams = dir.list_product_teams(&admin, product.id).await.unwrap();
    assert_eq!(teams.iter().map(|t| t.id).collect::<Vec<_>>(), vec![team.id]);

    let filtered = dir
        .list_teams(
            &admin,
            &TeamListQuery {
                list:       ListQuery::new(),
                product_id: Some(product.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(filtered.items.len(), 1);

    // Deleting the product leaves the team without one
    dir.delete_product(&admin, product.id).await.unwrap();
    assert_eq!(dir.get_team(&admin, team.id).await.unwrap().product_id, None);
}

#[tokio::test]
async fn test_attachments_stay_with_their_owner() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let x = dir
        .create_team(
            &admin,
            CreateTeamRequest {
                name: "X".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let y = dir
        .create_team(
            &admin,
            CreateTeamRequest {
                name: "Y".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    dir.add_additional_field(&admin, AttachmentOwner::Team(x.id), attach("On-call rota"))
        .await
        .unwrap();
    dir.add_additional_field(&admin, AttachmentOwner::Team(x.id), attach("Wiki"))
        .await
        .unwrap();
    dir.add_metric(&admin, AttachmentOwner::Team(y.id), attach("Velocity"))
        .await
        .unwrap();

    let for_x = dir
        .list_additional_fields(&admin, AttachmentOwner::Team(x.id), &ListQuery::new())
        .await
        .unwrap();
    assert_eq!(
        for_x.items.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        vec!["On-call rota", "Wiki"]
    );

    let for_y = dir
        .list_additional_fields(&admin, AttachmentOwner::Team(y.id), &ListQuery::new())
        .await
        .unwrap();
    assert!(for_y.items.is_empty());
    assert_eq!(
        dir.list_metrics(&admin, AttachmentOwner::Team(y.id), &ListQuery::new())
            .await
            .unwrap()
            .items
            .len(),
        1
    );

    // Same id under another kind is a different owner
    let err = dir
        .add_metric(&admin, AttachmentOwner::Component(x.id), attach("Latency"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
