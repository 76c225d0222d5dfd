//! # Product Operations
//!
//! Product tree maintenance, the product's component links and its teams.

use auth::{Caller, Permission, ProductAction, TeamAction};
use entity::{
    components::Column as ComponentColumn,
    product_components,
    products::{self, Column as ProductColumn},
    teams::Column as TeamColumn,
    Components,
    ProductComponents,
    Products,
    Teams,
};
use error::{AppError, OptionExt, Result};
use permissions_macro::with_permission;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    ModelTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;

use super::{
    attachments::{delete_for_owner, AttachmentOwner},
    components::find_components,
    employees::check_employee_ref,
    fetch_page,
    hierarchy,
    teams::to_team_responses,
    FieldErrors,
};
use crate::{
    dto::{
        components::ComponentResponse,
        products::{CreateProductRequest, ProductComponentsRequest, ProductResponse, UpdateProductRequest},
        teams::TeamResponse,
        ListQuery,
        Page,
    },
    utils::{dedup_ids, format_ids, icontains},
    Directory,
};

pub(crate) async fn find_product<C: ConnectionTrait>(db: &C, id: i32) -> Result<products::Model> {
    Products::find_by_id(id)
        .one(db)
        .await?
        .or_not_found(format_args!("Product {}", id))
}

async fn name_taken<C: ConnectionTrait>(db: &C, name: &str, exclude: Option<i32>) -> Result<bool> {
    let mut query = Products::find().filter(ProductColumn::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(ProductColumn::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Ids among `component_ids` already linked to the product
async fn linked_components<C: ConnectionTrait>(db: &C, product_id: i32, component_ids: &[i32]) -> Result<Vec<i32>> {
    Ok(ProductComponents::find()
        .filter(product_components::Column::ProductId.eq(product_id))
        .filter(product_components::Column::ComponentId.is_in(component_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.component_id)
        .collect())
}

impl Directory {
    #[with_permission(Permission::Products(ProductAction::Create))]
    pub async fn create_product(&self, caller: &Caller, req: CreateProductRequest) -> Result<ProductResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        if !errors.has("name") && name_taken(&txn, &req.name, None).await? {
            errors.push("name", "A product with this name already exists");
        }
        check_employee_ref(&txn, &mut errors, "manager_id", req.manager_id).await?;
        errors.into_result()?;
        hierarchy::validate_parent::<Products, _>(&txn, None, req.parent_id).await?;

        let product = products::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            manager_id: Set(req.manager_id),
            parent_id: Set(req.parent_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            product_id = product.id,
            parent_id = ?product.parent_id,
            caller_id = caller.employee_id,
            "Product created"
        );
        Ok(product.into())
    }

    #[with_permission(Permission::Products(ProductAction::Read))]
    pub async fn get_product(&self, caller: &Caller, id: i32) -> Result<ProductResponse> {
        Ok(find_product(&self.db, id).await?.into())
    }

    /// List products, searching over name and description
    #[with_permission(Permission::Products(ProductAction::Read))]
    pub async fn list_products(&self, caller: &Caller, query: &ListQuery) -> Result<Page<ProductResponse>> {
        let mut select = Products::find();
        if let Some(search) = query.search() {
            select = select.filter(
                Condition::any()
                    .add(icontains(ProductColumn::Name, search))
                    .add(icontains(ProductColumn::Description, search)),
            );
        }

        Ok(fetch_page(select.order_by_asc(ProductColumn::Name), &self.db, query)
            .await?
            .map(ProductResponse::from))
    }

    #[with_permission(Permission::Products(ProductAction::Update))]
    pub async fn update_product(&self, caller: &Caller, id: i32, req: UpdateProductRequest) -> Result<ProductResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        let product = hierarchy::find_for_update::<Products, _>(&txn, id)
            .await?
            .or_not_found(format_args!("Product {}", id))?;

        if let Some(name) = &req.name {
            if !errors.has("name") && name_taken(&txn, name, Some(id)).await? {
                errors.push("name", "A product with this name already exists");
            }
        }
        check_employee_ref(&txn, &mut errors, "manager_id", req.manager_id.flatten()).await?;
        errors.into_result()?;
        if let Some(parent_id) = req.parent_id {
            hierarchy::validate_parent::<Products, _>(&txn, Some(id), parent_id).await?;
        }

        let mut active: products::ActiveModel = product.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(description) = req.description {
            active.description = Set(description);
        }
        if let Some(manager_id) = req.manager_id {
            active.manager_id = Set(manager_id);
        }
        if let Some(parent_id) = req.parent_id {
            active.parent_id = Set(parent_id);
        }
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(product_id = id, caller_id = caller.employee_id, "Product updated");
        Ok(updated.into())
    }

    /// Delete a leaf product. Its teams lose their product; component links go with it.
    #[with_permission(Permission::Products(ProductAction::Delete))]
    pub async fn delete_product(&self, caller: &Caller, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        hierarchy::find_for_update::<Products, _>(&txn, id)
            .await?
            .or_not_found(format_args!("Product {}", id))?;
        hierarchy::ensure_leaf::<Products, _>(&txn, id).await?;

        Teams::update_many()
            .col_expr(TeamColumn::ProductId, Expr::value(Option::<i32>::None))
            .filter(TeamColumn::ProductId.eq(id))
            .exec(&txn)
            .await?;
        ProductComponents::delete_many()
            .filter(product_components::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        delete_for_owner(&txn, AttachmentOwner::Product(id)).await?;
        Products::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(product_id = id, caller_id = caller.employee_id, "Product deleted");
        Ok(())
    }

    #[with_permission(Permission::Products(ProductAction::Read))]
    pub async fn product_children(&self, caller: &Caller, id: i32) -> Result<Vec<ProductResponse>> {
        find_product(&self.db, id).await?;
        let children = hierarchy::children::<Products, _>(&self.db, id).await?;
        Ok(children.into_iter().map(ProductResponse::from).collect())
    }

    #[with_permission(Permission::Products(ProductAction::Read))]
    pub async fn root_products(&self, caller: &Caller) -> Result<Vec<ProductResponse>> {
        let roots = hierarchy::roots::<Products, _>(&self.db).await?;
        Ok(roots.into_iter().map(ProductResponse::from).collect())
    }

    /// Link components to the product. Components already linked are left as they are.
    #[with_permission(Permission::Products(ProductAction::ComponentsAdd))]
    pub async fn add_product_components(
        &self,
        caller: &Caller,
        id: i32,
        req: ProductComponentsRequest,
    ) -> Result<Vec<ComponentResponse>> {
        FieldErrors::validate(&req).into_result()?;
        let ids = dedup_ids(&req.component_ids);

        let txn = self.db.begin().await?;
        find_product(&txn, id).await?;
        let components = find_components(&txn, &ids).await?;
        let linked = linked_components(&txn, id, &ids).await?;

        let new_links: Vec<product_components::ActiveModel> = ids
            .iter()
            .filter(|component_id| !linked.contains(component_id))
            .map(|component_id| {
                product_components::ActiveModel {
                    product_id: Set(id),
                    component_id: Set(*component_id),
                    ..Default::default()
                }
            })
            .collect();
        if !new_links.is_empty() {
            ProductComponents::insert_many(new_links).exec(&txn).await?;
        }
        txn.commit().await?;

        info!(
            product_id = id,
            component_ids = ?ids,
            caller_id = caller.employee_id,
            "Components linked to product"
        );
        Ok(components.into_iter().map(ComponentResponse::from).collect())
    }

    /// Unlink components. Every id must currently be linked to the product.
    #[with_permission(Permission::Products(ProductAction::ComponentsRemove))]
    pub async fn remove_product_components(&self, caller: &Caller, id: i32, req: ProductComponentsRequest) -> Result<()> {
        FieldErrors::validate(&req).into_result()?;
        let ids = dedup_ids(&req.component_ids);

        let txn = self.db.begin().await?;
        let product = find_product(&txn, id).await?;
        let linked = linked_components(&txn, id, &ids).await?;

        let unlinked: Vec<i32> = ids.iter().copied().filter(|c| !linked.contains(c)).collect();
        if !unlinked.is_empty() {
            return Err(AppError::field(
                "component_ids",
                format!(
                    "Not linked to product {}: {}",
                    product.name,
                    format_ids(&unlinked)
                ),
            ));
        }

        ProductComponents::delete_many()
            .filter(product_components::Column::ProductId.eq(id))
            .filter(product_components::Column::ComponentId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(
            product_id = id,
            component_ids = ?ids,
            caller_id = caller.employee_id,
            "Components unlinked from product"
        );
        Ok(())
    }

    #[with_permission(Permission::Products(ProductAction::ComponentsRead))]
    pub async fn list_product_components(
        &self,
        caller: &Caller,
        id: i32,
        query: &ListQuery,
    ) -> Result<Page<ComponentResponse>> {
        let product = find_product(&self.db, id).await?;

        let mut select = product.find_related(Components);
        if let Some(search) = query.search() {
            select = select.filter(icontains(ComponentColumn::Name, search));
        }
        let select = select.order_by_asc(ComponentColumn::Name);

        Ok(fetch_page(select, &self.db, query)
            .await?
            .map(ComponentResponse::from))
    }

    /// Teams working on the product
    #[with_permission(any = Permission::Products(ProductAction::Read), Permission::Teams(TeamAction::Read))]
    pub async fn list_product_teams(&self, caller: &Caller, id: i32) -> Result<Vec<TeamResponse>> {
        find_product(&self.db, id).await?;
        let teams = Teams::find()
            .filter(TeamColumn::ProductId.eq(id))
            .order_by_asc(TeamColumn::Name)
            .all(&self.db)
            .await?;
        to_team_responses(&self.db, teams).await
    }
}
