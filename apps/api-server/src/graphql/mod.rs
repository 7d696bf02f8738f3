//! GraphQL schema over the resolver dispatch.

mod error;
mod types;

use actix_web::{HttpResponse, web};
use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, ID, Object, Result, Schema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use postboard_shared::dto::LoginInput;

use crate::middleware::auth::AuthContext;
use crate::resolvers::Resolvers;

pub use error::graphql_error;
use types::{AuthData, PostData, PostInputData, PostObject, PostUpdateData, UserInputData, UserObject};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the resolvers as shared data.
pub fn build_schema(resolvers: Resolvers) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(resolvers)
        .finish()
}

fn resolvers<'a>(ctx: &Context<'a>) -> &'a Resolvers {
    ctx.data_unchecked::<Resolvers>()
}

fn auth(ctx: &Context<'_>) -> AuthContext {
    ctx.data_opt::<AuthContext>().copied().unwrap_or_default()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthData> {
        resolvers(ctx)
            .login(LoginInput { email, password })
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }

    async fn posts(&self, ctx: &Context<'_>, page: Option<i32>) -> Result<PostData> {
        resolvers(ctx)
            .posts(&auth(ctx), page)
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<PostObject> {
        resolvers(ctx)
            .post(&auth(ctx), id.as_str())
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<UserObject> {
        resolvers(ctx)
            .user(&auth(ctx))
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, user_input: UserInputData) -> Result<UserObject> {
        resolvers(ctx)
            .create_user(user_input.into())
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }

    async fn create_post(&self, ctx: &Context<'_>, post_input: PostInputData) -> Result<PostObject> {
        resolvers(ctx)
            .create_post(&auth(ctx), post_input.into())
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        post_input: PostUpdateData,
    ) -> Result<PostObject> {
        resolvers(ctx)
            .update_post(&auth(ctx), id.as_str(), post_input.into())
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        resolvers(ctx)
            .delete_post(&auth(ctx), id.as_str())
            .await
            .map_err(graphql_error)
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> Result<UserObject> {
        resolvers(ctx)
            .update_status(&auth(ctx), status)
            .await
            .map(Into::into)
            .map_err(graphql_error)
    }
}

/// POST /graphql
pub async fn graphql_handler(
    schema: web::Data<AppSchema>,
    auth: AuthContext,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner().data(auth)).await.into()
}

/// GET /graphql - interactive explorer
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
