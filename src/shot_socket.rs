// src/shot_socket.rs

//! WebSocket feed pushing every processed shot to the browser as JSON text.

use actix::{Actor, ActorContext, AsyncContext, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{error, info, warn};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::hub::{ShotHub, ShotSummary};

pub struct ShotFeedSocket {
    feed: Option<broadcast::Receiver<ShotSummary>>,
}

impl ShotFeedSocket {
    pub fn new(feed: broadcast::Receiver<ShotSummary>) -> Self {
        Self { feed: Some(feed) }
    }
}

impl Actor for ShotFeedSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        if let Some(feed) = self.feed.take() {
            ctx.add_stream(BroadcastStream::new(feed));
        }
    }
}

impl StreamHandler<Result<ShotSummary, BroadcastStreamRecvError>> for ShotFeedSocket {
    fn handle(&mut self, item: Result<ShotSummary, BroadcastStreamRecvError>, ctx: &mut Self::Context) {
        match item {
            Ok(summary) => match serde_json::to_string(&summary) {
                Ok(text) => ctx.text(text),
                Err(e) => error!("Failed to encode shot for feed: {}", e),
            },
            Err(BroadcastStreamRecvError::Lagged(missed)) => {
                warn!("Shot feed client lagged, skipped {} shots", missed);
            }
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ShotFeedSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                warn!("Shot feed protocol error: {}", e);
                ctx.stop();
            }
            _ => {}
        }
    }
}

pub async fn handle_ws_start(
    req: HttpRequest,
    stream: web::Payload,
    hub: web::Data<ShotHub>,
) -> Result<HttpResponse, Error> {
    match ws::start(ShotFeedSocket::new(hub.subscribe()), &req, stream) {
        Ok(response) => {
            info!("Shot feed client connected");
            Ok(response)
        }
        Err(e) => {
            error!("Shot feed WebSocket error: {}", e);
            Err(e)
        }
    }
}
