//! Generic resource dispatcher.
//!
//! A [`ResourceEndpoint`] bundles everything one resource needs: a record
//! store, an input/output contract, declared filters, a permission policy,
//! and any named actions. The HTTP adapter routes a verb and path shape to an
//! [`Operation`] and hands it here; the endpoint owns the rest, so adding a
//! resource is wiring, not code.

use std::collections::HashMap;
use std::sync::Arc;

use pagination::{paginate, PageParamError, PageRequest};
use serde_json::{json, Value};

use crate::domain::contract::ID_FIELD;
use crate::domain::filter::apply_filters;
use crate::domain::ports::RecordStore;
use crate::domain::{ApiError, Contract, FilterSpec, PermissionPolicy, Record, RequestContext};

/// One resolved resource operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `GET` on the collection.
    List,
    /// `POST` on the collection.
    Create,
    /// `GET` on one record.
    Retrieve {
        /// Addressed record identifier.
        id: String,
    },
    /// `PUT` on one record; binding is partial.
    Update {
        /// Addressed record identifier.
        id: String,
    },
    /// `DELETE` on one record; idempotent.
    Destroy {
        /// Addressed record identifier.
        id: String,
    },
    /// `POST`/`PUT` on a named action of one record.
    Action {
        /// Addressed record identifier.
        id: String,
        /// Declared action name from the path.
        name: String,
    },
}

impl Operation {
    /// Map a verb and path shape to an operation.
    ///
    /// Unsupported verbs on an otherwise valid shape are a method-not-allowed
    /// fault, which the adapter turns into a bare 405.
    pub fn route(
        method: &str,
        id: Option<&str>,
        action: Option<&str>,
    ) -> Result<Self, ApiError> {
        match (method, id, action) {
            (_, None, Some(_)) => Err(ApiError::MethodNotAllowed),
            ("POST" | "PUT", Some(id), Some(action)) => Ok(Self::Action {
                id: id.to_owned(),
                name: action.to_owned(),
            }),
            (_, Some(_), Some(_)) => Err(ApiError::MethodNotAllowed),
            ("GET", Some(id), None) => Ok(Self::Retrieve { id: id.to_owned() }),
            ("PUT", Some(id), None) => Ok(Self::Update { id: id.to_owned() }),
            ("DELETE", Some(id), None) => Ok(Self::Destroy { id: id.to_owned() }),
            ("GET", None, None) => Ok(Self::List),
            ("POST", None, None) => Ok(Self::Create),
            _ => Err(ApiError::MethodNotAllowed),
        }
    }
}

struct ActionSpec {
    contract: Arc<dyn Contract>,
    policy: Option<PermissionPolicy>,
}

/// One resource wired into the dispatcher.
pub struct ResourceEndpoint {
    name: String,
    store: Arc<dyn RecordStore>,
    contract: Arc<dyn Contract>,
    filters: Vec<FilterSpec>,
    policy: PermissionPolicy,
    actions: HashMap<String, ActionSpec>,
    log_body: bool,
    paginated: bool,
}

impl ResourceEndpoint {
    /// Endpoint over a store and contract; authorization defaults to the
    /// login-required baseline.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn RecordStore>,
        contract: Arc<dyn Contract>,
    ) -> Self {
        Self {
            name: name.into(),
            store,
            contract,
            filters: Vec::new(),
            policy: PermissionPolicy::login_required(),
            actions: HashMap::new(),
            log_body: true,
            paginated: true,
        }
    }

    /// Replace the permission policy.
    #[must_use]
    pub fn with_policy(mut self, policy: PermissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Declare the list filters.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<FilterSpec>) -> Self {
        self.filters = filters;
        self
    }

    /// Declare a named action with its own contract, inheriting the
    /// endpoint's policy.
    #[must_use]
    pub fn with_action(mut self, name: impl Into<String>, contract: Arc<dyn Contract>) -> Self {
        self.actions.insert(
            name.into(),
            ActionSpec {
                contract,
                policy: None,
            },
        );
        self
    }

    /// Declare a named action with its own contract and policy.
    #[must_use]
    pub fn with_guarded_action(
        mut self,
        name: impl Into<String>,
        contract: Arc<dyn Contract>,
        policy: PermissionPolicy,
    ) -> Self {
        self.actions.insert(
            name.into(),
            ActionSpec {
                contract,
                policy: Some(policy),
            },
        );
        self
    }

    /// Suppress request bodies from this endpoint's audit lines.
    #[must_use]
    pub fn without_body_logging(mut self) -> Self {
        self.log_body = false;
        self
    }

    /// Serve the whole filtered collection; list payloads carry `items`
    /// only.
    #[must_use]
    pub fn without_pagination(mut self) -> Self {
        self.paginated = false;
        self
    }

    /// Mount path segment of the resource.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether audit entry lines may include the request body.
    #[must_use]
    pub fn logs_body(&self) -> bool {
        self.log_body
    }

    /// Authorize the operation, using the action's policy when it has one.
    pub fn authorize(&self, operation: &Operation, ctx: &RequestContext) -> Result<(), ApiError> {
        let policy = match operation {
            Operation::Action { name, .. } => self
                .actions
                .get(name)
                .and_then(|spec| spec.policy.as_ref())
                .unwrap_or(&self.policy),
            _ => &self.policy,
        };
        policy.evaluate(ctx)
    }

    /// Execute an authorized operation, producing the envelope's data value.
    pub async fn execute(
        &self,
        operation: Operation,
        ctx: &RequestContext,
        body: &Value,
    ) -> Result<Value, ApiError> {
        match operation {
            Operation::List => self.list(ctx).await,
            Operation::Create => self.create(body).await,
            Operation::Retrieve { id } => self.retrieve(&id).await,
            Operation::Update { id } => self.update(&id, body).await,
            Operation::Destroy { id } => self.destroy(&id).await,
            Operation::Action { id, name } => self.run_action(&id, &name, body).await,
        }
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Value, ApiError> {
        let records = apply_filters(self.store.all().await?, &self.filters, &ctx.params);
        if !self.paginated {
            let items: Vec<Value> = records
                .iter()
                .map(|record| self.contract.render(record))
                .collect();
            return Ok(json!({ "items": items }));
        }
        let request = PageRequest::from_params(ctx.query_param("page"), ctx.query_param("size"))
            .map_err(|error| match error {
                PageParamError::Page => ApiError::field_error("page", error.to_string()),
                PageParamError::Size => ApiError::field_error("size", error.to_string()),
            })?;
        let page = paginate(records, request);
        let items: Vec<Value> = page
            .items
            .iter()
            .map(|record| self.contract.render(record))
            .collect();
        Ok(json!({
            "items": items,
            "page": page.page,
            "page_size": page.page_size,
            "total_page": page.total_page,
            "total_count": page.total_count,
        }))
    }

    async fn create(&self, body: &Value) -> Result<Value, ApiError> {
        let bound = self
            .contract
            .bind(body, None, false)
            .map_err(ApiError::Validation)?;
        let stored = self.store.insert(bound).await?;
        Ok(json!({ "item": self.contract.render(&stored) }))
    }

    async fn retrieve(&self, id: &str) -> Result<Value, ApiError> {
        let record = self.require(id).await?;
        Ok(json!({ "item": self.contract.render(&record) }))
    }

    async fn update(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        let existing = self.require(id).await?;
        // Updates are always partial; absent fields keep their stored values.
        let bound = self
            .contract
            .bind(body, Some(&existing), true)
            .map_err(ApiError::Validation)?;
        let stored = self.store.save(bound).await?;
        Ok(json!({ "item": self.contract.render(&stored) }))
    }

    async fn destroy(&self, id: &str) -> Result<Value, ApiError> {
        // Deleting an absent record is still a success; the desired state
        // already holds.
        self.store.delete(id).await?;
        Ok(Value::Null)
    }

    async fn run_action(&self, id: &str, name: &str, body: &Value) -> Result<Value, ApiError> {
        let Some(spec) = self.actions.get(name) else {
            return Err(ApiError::NotFound);
        };
        let existing = self.require(id).await?;
        let bound = spec
            .contract
            .bind(body, Some(&existing), false)
            .map_err(ApiError::Validation)?;
        let stored = self.store.save(bound).await?;
        Ok(json!({ "item": spec.contract.render(&stored) }))
    }

    async fn require(&self, id: &str) -> Result<Record, ApiError> {
        self.store
            .find(id)
            .await?
            .ok_or(ApiError::NotFound)
            .map(|mut record| {
                record
                    .entry(ID_FIELD.to_owned())
                    .or_insert_with(|| Value::String(id.to_owned()));
                record
            })
    }
}
