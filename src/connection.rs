use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::Error;

pub struct Connection {
    pub id: Uuid,
    // Data read from the socket is buffered inside `Framed` until the codec can cut a whole frame
    // out of it; partial frames stay there across reads.
    framed: Framed<TcpStream, FrameCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream, codec: FrameCodec) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, codec),
        }
    }

    /// Waits for the next complete frame. Returns `None` once the peer closed the connection.
    pub async fn read_frame(&mut self) -> Result<Option<BytesMut>, Error> {
        self.framed.next().await.transpose()
    }

    pub async fn write_frame(&mut self, frame: Bytes) -> Result<(), Error> {
        self.framed.send(frame).await
    }

    /// Serializes `message` as JSON and writes it as one frame.
    pub async fn write_message<T: Serialize>(&mut self, message: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(message)?;
        self.write_frame(Bytes::from(body)).await
    }
}
