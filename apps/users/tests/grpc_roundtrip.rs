//! Drives the server over a real socket with a generated client.

use domain_users::{
    EventPublisher, InMemoryEventPublisher, InMemoryUserRepository, PgUserRepository,
    StreamEventPublisher, UserRepository, UserService,
};
use event_stream::StreamProducer;
use rpc::users::v1::user_service_client::UserServiceClient;
use rpc::users::v1::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, SelectUserFilters,
    UpdateUserField, UpdateUserRequest, User,
};
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;
use test_utils::{TestDataBuilder, TestDatabase, TestRedis};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::Code;
use tonic::codec::CompressionEncoding;
use tonic::transport::Channel;
use tonic_health::pb::HealthCheckRequest;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use zerg_users::UsersServiceImpl;

struct RunningServer {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<eyre::Result<()>>,
}

impl RunningServer {
    async fn start<R, P>(service: UserService<R, P>) -> Self
    where
        R: UserRepository + 'static,
        P: EventPublisher + 'static,
    {
        let addr = free_addr();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(zerg_users::serve(
            addr,
            UsersServiceImpl::new(service),
            None,
            async move {
                let _ = stopped.await;
            },
        ));

        Self {
            addr,
            stop: Some(stop),
            handle,
        }
    }

    async fn channel(&self) -> Channel {
        let endpoint = format!("http://{}", self.addr);
        for _ in 0..100 {
            if let Ok(channel) = Channel::from_shared(endpoint.clone()).unwrap().connect().await {
                return channel;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("server at {} never accepted connections", self.addr);
    }

    async fn client(&self) -> UserServiceClient<Channel> {
        UserServiceClient::new(self.channel().await)
            .send_compressed(CompressionEncoding::Zstd)
            .accept_compressed(CompressionEncoding::Zstd)
    }

    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn new_user(email: &str, country: &str) -> User {
    User {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        nickname: "ada".into(),
        password: "s3cret".into(),
        email: email.into(),
        country: country.into(),
        ..Default::default()
    }
}

/// Create, read, list, update, delete, then confirm the user is gone.
async fn lifecycle(client: &mut UserServiceClient<Channel>, data: &TestDataBuilder) {
    let created = client
        .create_user(CreateUserRequest {
            user: Some(new_user(&data.email("ada"), "GBR")),
        })
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();
    assert!(!created.id.is_empty());
    assert!(created.created_at.is_some());
    assert!(created.updated_at.is_none());

    let duplicate = client
        .create_user(CreateUserRequest {
            user: Some(new_user(&data.email("ada"), "DEU")),
        })
        .await
        .unwrap_err();
    assert_eq!(duplicate.code(), Code::AlreadyExists);

    let fetched = client
        .get_user(GetUserRequest {
            id: created.id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();
    assert_eq!(fetched.email, created.email);

    let listed = client
        .list_users(ListUsersRequest {
            filters: Some(SelectUserFilters {
                countries: vec!["GBR".into()],
            }),
            offset: 0,
            limit: 0,
        })
        .await
        .unwrap()
        .into_inner()
        .users;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    let mut changes = fetched.clone();
    changes.first_name = "Augusta".into();
    changes.last_name = "King".into();
    let updated = client
        .update_user(UpdateUserRequest {
            user: Some(changes),
            update_fields: vec![UpdateUserField::FirstName as i32],
        })
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();
    assert!(updated.updated_at.is_some());

    let stored = client
        .get_user(GetUserRequest {
            id: created.id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();
    assert_eq!(stored.first_name, "Augusta");
    assert_eq!(stored.last_name, "Lovelace");

    client
        .delete_user(DeleteUserRequest {
            id: created.id.clone(),
        })
        .await
        .unwrap();

    let gone = client
        .get_user(GetUserRequest { id: created.id })
        .await
        .unwrap_err();
    assert_eq!(gone.code(), Code::NotFound);
}

#[tokio::test]
async fn test_lifecycle_in_memory() {
    let publisher = InMemoryEventPublisher::new();
    let server = RunningServer::start(UserService::new(
        InMemoryUserRepository::new(),
        publisher.clone(),
    ))
    .await;

    let mut client = server.client().await;
    lifecycle(&mut client, &TestDataBuilder::from_test_name("lifecycle_in_memory")).await;

    let topics: Vec<String> = publisher.published().into_iter().map(|(t, _)| t).collect();
    assert_eq!(
        topics,
        ["user-created_v1", "user-updated_v1", "user-deleted_v1"]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_rejects_malformed_requests() {
    let server = RunningServer::start(UserService::new(
        InMemoryUserRepository::new(),
        InMemoryEventPublisher::new(),
    ))
    .await;
    let mut client = server.client().await;

    let err = client
        .get_user(GetUserRequest {
            id: "not-a-uuid".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);

    let err = client
        .update_user(UpdateUserRequest {
            user: Some(new_user("a@b.com", "DEU")),
            update_fields: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);

    server.stop().await;
}

#[tokio::test]
async fn test_health_reports_serving() {
    let server = RunningServer::start(UserService::new(
        InMemoryUserRepository::new(),
        InMemoryEventPublisher::new(),
    ))
    .await;
    let mut health = HealthClient::new(server.channel().await);

    for service in ["users.v1.UserService", ""] {
        let status = health
            .check(HealthCheckRequest {
                service: service.into(),
            })
            .await
            .unwrap()
            .into_inner()
            .status;
        assert_eq!(status, ServingStatus::Serving as i32);
    }

    server.stop().await;
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_lifecycle_against_postgres_and_redis() {
    let db = TestDatabase::new().await;
    let redis = TestRedis::new().await;

    let service = UserService::new(
        PgUserRepository::new(db.connection()),
        StreamEventPublisher::new(StreamProducer::new(redis.connection_manager().await)),
    );
    let server = RunningServer::start(service).await;

    let mut client = server.client().await;
    lifecycle(&mut client, &TestDataBuilder::from_test_name("lifecycle_pg")).await;

    for topic in ["user-created_v1", "user-updated_v1", "user-deleted_v1"] {
        assert_eq!(redis.stream_len(topic).await, 1, "{topic}");
    }

    server.stop().await;
}
