use tokio::net::{TcpStream, ToSocketAddrs};

use crate::codec::FrameCodec;
use crate::connection::Connection;
use crate::frame::{Request, Response};
use crate::server::EXIT;
use crate::Error;

/// A client speaking the server's framed JSON protocol over one long-lived connection.
pub struct Client {
    connection: Connection,
}

impl Client {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Client, Error> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Client {
            connection: Connection::new(stream, FrameCodec::default()),
        })
    }

    /// Sends `request` and waits for its response.
    pub async fn execute(&mut self, request: Request) -> Result<Response, Error> {
        self.connection.write_message(&request).await?;

        let frame = self
            .connection
            .read_frame()
            .await?
            .ok_or("connection closed by server")?;

        Ok(Response::parse(&frame)?)
    }

    /// Asks the server to persist the collection and close the connection. The server sends no
    /// response to `exit`; this waits until it has closed its side.
    pub async fn exit(mut self) -> Result<(), Error> {
        self.connection.write_message(&Request::new(EXIT)).await?;

        while self.connection.read_frame().await?.is_some() {}
        Ok(())
    }

    pub fn connection(&mut self) -> &mut Connection {
        &mut self.connection
    }
}
