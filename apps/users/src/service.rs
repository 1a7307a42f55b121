//! Users gRPC service implementation
//!
//! Handlers validate the request, call the domain [`UserService`], and map
//! domain errors to a small set of status codes.

use domain_users::{EventPublisher, FieldMask, UserError, UserRepository, UserService};
use rpc::users::v1::{
    CreateUserRequest, CreateUserResponse, DeleteUserRequest, DeleteUserResponse, GetUserRequest,
    GetUserResponse, ListUsersRequest, ListUsersResponse, UpdateUserRequest, UpdateUserResponse,
    user_service_server::UserService as UserRpc,
};
use std::fmt;
use tonic::{Request, Response, Status};
use tracing::{error, info};
use uuid::Uuid;

use crate::conversions::{filter_from_proto, user_from_proto, user_to_proto};
use crate::validation;

pub const USER_ALREADY_EXISTS: &str = "user already exists with this email";
pub const USER_NOT_FOUND: &str = "user is not found";
pub const INTERNAL_ERROR: &str = "oops something went wrong!";

/// Which handler produced an error; the not-found wording depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rpc {
    CreateUser,
    GetUser,
    ListUsers,
    UpdateUser,
    DeleteUser,
}

impl fmt::Display for Rpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rpc::CreateUser => "CreateUser",
            Rpc::GetUser => "GetUser",
            Rpc::ListUsers => "ListUsers",
            Rpc::UpdateUser => "UpdateUser",
            Rpc::DeleteUser => "DeleteUser",
        };
        f.write_str(name)
    }
}

/// Internal errors are logged here and replaced by a generic message.
fn to_status(rpc: Rpc, err: UserError) -> Status {
    match err {
        UserError::Validation(message) => Status::invalid_argument(message),
        UserError::DuplicateEmail => Status::already_exists(USER_ALREADY_EXISTS),
        err if err.is_not_found() => match rpc {
            Rpc::UpdateUser => Status::not_found(err.to_string()),
            _ => Status::not_found(USER_NOT_FOUND),
        },
        err => {
            error!(rpc = %rpc, error = %err, "request failed");
            Status::internal(INTERNAL_ERROR)
        }
    }
}

fn mask_names(mask: &FieldMask) -> String {
    mask.iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// gRPC service implementation for users
///
/// Generic over the repository and publisher so handlers can be exercised
/// without a database or broker.
pub struct UsersServiceImpl<R, P>
where
    R: UserRepository + 'static,
    P: EventPublisher + 'static,
{
    service: UserService<R, P>,
}

impl<R, P> UsersServiceImpl<R, P>
where
    R: UserRepository + 'static,
    P: EventPublisher + 'static,
{
    pub fn new(service: UserService<R, P>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<R, P> UserRpc for UsersServiceImpl<R, P>
where
    R: UserRepository + 'static,
    P: EventPublisher + 'static,
{
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<CreateUserResponse>, Status> {
        let rpc = Rpc::CreateUser;
        let proto = validation::require_user(request.into_inner().user)
            .map_err(|e| to_status(rpc, e))?;

        let mut user = user_from_proto(proto, Uuid::nil());
        user.created_at = None;
        user.updated_at = None;
        validation::validate_user(&user).map_err(|e| to_status(rpc, e))?;

        self.service
            .create_user(&mut user)
            .await
            .map_err(|e| to_status(rpc, e))?;

        info!(user_id = %user.id, "user is created");
        Ok(Response::new(CreateUserResponse {
            user: Some(user_to_proto(user)),
        }))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let rpc = Rpc::GetUser;
        let id = validation::parse_id(&request.into_inner().id).map_err(|e| to_status(rpc, e))?;

        let user = self
            .service
            .get_user(id)
            .await
            .map_err(|e| to_status(rpc, e))?;

        info!(user_id = %id, "user is fetched");
        Ok(Response::new(GetUserResponse {
            user: Some(user_to_proto(user)),
        }))
    }

    async fn list_users(
        &self,
        request: Request<ListUsersRequest>,
    ) -> Result<Response<ListUsersResponse>, Status> {
        let req = request.into_inner();
        let filter = filter_from_proto(req.filters);

        let users = self
            .service
            .list_users(&filter, req.offset, req.limit)
            .await
            .map_err(|e| to_status(Rpc::ListUsers, e))?;

        info!(count = users.len(), "users are listed");
        Ok(Response::new(ListUsersResponse {
            users: users.into_iter().map(user_to_proto).collect(),
        }))
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UpdateUserResponse>, Status> {
        let rpc = Rpc::UpdateUser;
        let req = request.into_inner();

        let proto = validation::require_user(req.user).map_err(|e| to_status(rpc, e))?;
        validation::require_id(&proto.id).map_err(|e| to_status(rpc, e))?;
        let mask =
            validation::parse_update_fields(&req.update_fields).map_err(|e| to_status(rpc, e))?;
        let id = validation::parse_id(&proto.id).map_err(|e| to_status(rpc, e))?;

        let mut user = user_from_proto(proto, id);
        validation::validate_user(&user).map_err(|e| to_status(rpc, e))?;

        self.service
            .update_user(&mut user, &mask)
            .await
            .map_err(|e| to_status(rpc, e))?;

        info!(user_id = %id, update_fields = %mask_names(&mask), "user is updated");
        Ok(Response::new(UpdateUserResponse {
            user: Some(user_to_proto(user)),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteUserResponse>, Status> {
        let rpc = Rpc::DeleteUser;
        let id = validation::parse_id(&request.into_inner().id).map_err(|e| to_status(rpc, e))?;

        self.service
            .delete_user(id)
            .await
            .map_err(|e| to_status(rpc, e))?;

        info!(user_id = %id, "user is deleted");
        Ok(Response::new(DeleteUserResponse {}))
    }
}
