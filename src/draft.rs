//! Draft records
//!
//! Edit-form state for orders, products and customers: the record as last
//! saved, the working copy and the save status. Required fields are checked
//! before any network call.

use async_trait::async_trait;
use thiserror::Error;

use crate::gateway::{
    Customer, CustomerPatch, Gateway, GatewayError, GatewayResult, NewCustomer, NewOrder,
    NewProduct, Order, OrderPatch, Product, ProductPatch,
};
use crate::locale::Message;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entity}: missing required field(s) {}", .fields.join(", "))]
    MissingFields {
        entity: &'static str,
        fields: Vec<&'static str>,
    },
}

impl ValidationError {
    /// Localizable message for the form banner
    pub fn message(&self) -> Message {
        match self {
            ValidationError::MissingFields { entity, .. } => match *entity {
                "order" => Message::RequiredOrderFields,
                "product" => Message::RequiredProductFields,
                _ => Message::RequiredCustomerFields,
            },
        }
    }
}

/// Required-field check of an edit form
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require(entity: &'static str, fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields {
            entity,
            fields: missing,
        })
    }
}

impl Validate for NewOrder {
    fn validate(&self) -> Result<(), ValidationError> {
        require(
            "order",
            &[
                ("customer_name", self.customer_name.as_str()),
                ("customer_email", self.customer_email.as_str()),
            ],
        )
    }
}

impl Validate for NewProduct {
    fn validate(&self) -> Result<(), ValidationError> {
        require("product", &[("name", self.name.as_str())])
    }
}

impl Validate for NewCustomer {
    fn validate(&self) -> Result<(), ValidationError> {
        require(
            "customer",
            &[("name", self.name.as_str()), ("email", self.email.as_str())],
        )
    }
}

/// A stored record that can be opened in an edit form
pub trait Editable: Clone {
    type Form: Clone + PartialEq + Validate + Default;

    fn id(&self) -> &str;
    fn to_form(&self) -> Self::Form;
}

impl Editable for Order {
    type Form = NewOrder;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> NewOrder {
        NewOrder::from(self)
    }
}

impl Editable for Product {
    type Form = NewProduct;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> NewProduct {
        NewProduct::from(self)
    }
}

impl Editable for Customer {
    type Form = NewCustomer;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> NewCustomer {
        NewCustomer::from(self)
    }
}

/// Where drafts are saved
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait DraftStore<R: Editable> {
    async fn create(&self, form: &R::Form) -> GatewayResult<R>;
    async fn update(&self, id: &str, form: &R::Form) -> GatewayResult<R>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl DraftStore<Order> for Gateway {
    async fn create(&self, form: &NewOrder) -> GatewayResult<Order> {
        self.orders().create(form).await
    }

    async fn update(&self, id: &str, form: &NewOrder) -> GatewayResult<Order> {
        self.orders().update(id, &OrderPatch::from(form)).await
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl DraftStore<Product> for Gateway {
    async fn create(&self, form: &NewProduct) -> GatewayResult<Product> {
        self.products().create(form).await
    }

    async fn update(&self, id: &str, form: &NewProduct) -> GatewayResult<Product> {
        self.products().update(id, &ProductPatch::from(form)).await
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl DraftStore<Customer> for Gateway {
    async fn create(&self, form: &NewCustomer) -> GatewayResult<Customer> {
        self.customers().create(form).await
    }

    async fn update(&self, id: &str, form: &NewCustomer) -> GatewayResult<Customer> {
        self.customers().update(id, &CustomerPatch::from(form)).await
    }
}

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Save failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("A save is already in progress")]
    AlreadySaving,
}

/// Working copy of a record being created or edited
#[derive(Debug, Clone)]
pub struct Draft<R: Editable> {
    id: Option<String>,
    original: Option<R::Form>,
    pub current: R::Form,
    saving: bool,
    error: Option<String>,
}

impl<R: Editable> Draft<R> {
    /// Blank form for a new record
    pub fn create() -> Self {
        Self::create_with(R::Form::default())
    }

    /// New-record form with prefilled fields
    pub fn create_with(form: R::Form) -> Self {
        Self {
            id: None,
            original: None,
            current: form,
            saving: false,
            error: None,
        }
    }

    /// Form for editing an existing record
    pub fn edit(record: &R) -> Self {
        let form = record.to_form();
        Self {
            id: Some(record.id().to_string()),
            original: Some(form.clone()),
            current: form,
            saving: false,
            error: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// New records are always dirty; existing ones when the form differs
    pub fn is_dirty(&self) -> bool {
        match &self.original {
            Some(original) => original != &self.current,
            None => true,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.current.validate()
    }

    /// Validate and mark the draft as saving
    pub fn begin_save(&mut self) -> Result<(), DraftError> {
        if self.saving {
            return Err(DraftError::AlreadySaving);
        }
        self.validate()?;
        self.saving = true;
        self.error = None;
        Ok(())
    }

    /// Record the outcome of a save. On success the saved record becomes
    /// the new baseline; on failure the working copy is kept.
    pub fn finish_save(&mut self, result: &GatewayResult<R>) {
        self.saving = false;
        match result {
            Ok(record) => {
                let form = record.to_form();
                self.id = Some(record.id().to_string());
                self.original = Some(form.clone());
                self.current = form;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, id = ?self.id, "failed to save draft");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Validate, then create or update through `store`
    pub async fn save<S>(&mut self, store: &S) -> Result<R, DraftError>
    where
        S: DraftStore<R> + ?Sized,
    {
        self.begin_save()?;

        let result = match &self.id {
            Some(id) => store.update(id, &self.current).await,
            None => store.create(&self.current).await,
        };

        self.finish_save(&result);
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{order_json, product_json, MockBackend};
    use serde_json::json;

    #[test]
    fn test_order_requires_name_and_email() {
        let form = NewOrder {
            customer_name: "  ".to_string(),
            ..Default::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                entity: "order",
                fields: vec!["customer_name", "customer_email"],
            }
        );
        assert_eq!(err.message(), Message::RequiredOrderFields);
    }

    #[test]
    fn test_new_draft_is_dirty() {
        let draft: Draft<Product> = Draft::create();
        assert!(draft.is_new());
        assert!(draft.is_dirty());
    }

    #[test]
    fn test_edit_draft_dirty_tracking() {
        let order: Order = serde_json::from_value(order_json("1", "ORD-2024001", "pending")).unwrap();
        let mut draft = Draft::edit(&order);
        assert!(!draft.is_dirty());

        draft.current.items_count = 5;
        assert!(draft.is_dirty());

        draft.current.items_count = order.items_count;
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_begin_save_validates_first() {
        let mut draft: Draft<Customer> = Draft::create();
        assert!(matches!(draft.begin_save(), Err(DraftError::Validation(_))));
        assert!(!draft.is_saving());
    }

    #[tokio::test]
    async fn test_invalid_draft_makes_no_request() {
        let backend = MockBackend::start().await;
        let mut draft: Draft<Order> = Draft::create();

        let result = draft.save(&backend.gateway()).await;
        assert!(matches!(result, Err(DraftError::Validation(_))));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_save_new_product() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/rest/v1/products",
            201,
            product_json("p1", "AirPods Pro 2", "audio"),
        );

        let mut draft: Draft<Product> = Draft::create_with(NewProduct {
            name: "AirPods Pro 2".to_string(),
            price: 99.0,
            ..Default::default()
        });
        let saved = draft.save(&backend.gateway()).await.unwrap();

        assert_eq!(saved.id, "p1");
        assert_eq!(draft.id(), Some("p1"));
        assert!(!draft.is_dirty());
        assert!(!draft.is_saving());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_working_copy() {
        let backend = MockBackend::start().await;
        backend.respond(
            "PATCH",
            "/rest/v1/orders",
            500,
            json!({ "message": "internal error" }),
        );

        let order: Order = serde_json::from_value(order_json("1", "ORD-2024001", "pending")).unwrap();
        let mut draft = Draft::edit(&order);
        draft.current.customer_name = "王五".to_string();

        let result = draft.save(&backend.gateway()).await;
        assert!(matches!(result, Err(DraftError::Gateway(_))));
        assert_eq!(draft.current.customer_name, "王五");
        assert!(draft.is_dirty());
        assert!(draft.error().is_some());
        assert!(!draft.is_saving());
    }
}
