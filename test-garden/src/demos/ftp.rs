//! A mock socket talking to a tiny FTP-like server.
//!
//! Every leaf logs in on a fresh socket, so "list files" sees only the
//! uploads made along its own path.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use test_garden::{Garden, GardenError, Summary, check};

const FOX_CHAPTER_1: &str = "The quick brown fox jumped";
const FOX_CHAPTER_2: &str = "over the lazy dog's back.";

#[derive(Debug, Default)]
struct MockSocket {
    closed: bool,
    logged_in: bool,
    inbox: VecDeque<String>,
    files: Vec<String>,
}

impl MockSocket {
    fn close(&mut self) {
        self.closed = true;
    }

    fn send(&mut self, message: &str) -> Result<()> {
        if self.closed {
            bail!("send on closed socket");
        }
        if !self.logged_in {
            if message == "nobody" {
                self.inbox.push_back("go away".to_string());
            } else {
                self.logged_in = true;
                self.inbox.push_back("hello".to_string());
            }
            return Ok(());
        }
        if message == "ls" {
            self.inbox.push_back(self.files.join(","));
        } else if let Some(name) = message.strip_prefix("upload ") {
            self.files.push(name.to_string());
        } else if let Some(name) = message.strip_prefix("rm ") {
            self.files.retain(|file| file != name);
        }
        Ok(())
    }

    fn recv(&mut self) -> Result<String> {
        if self.closed {
            bail!("recv on closed socket");
        }
        self.inbox.pop_front().context("nothing to receive")
    }
}

type Socket = Rc<RefCell<MockSocket>>;

fn send(sock: &Socket, message: &str) -> Result<()> {
    sock.borrow_mut().send(message)
}

fn exchange(sock: &Socket, message: &str) -> Result<String> {
    let mut sock = sock.borrow_mut();
    sock.send(message)?;
    sock.recv()
}

pub fn run(garden: Garden) -> Result<Summary, GardenError> {
    garden.run("ftp server", |g| {
        let sock = Socket::default();
        let on_exit = Rc::clone(&sock);
        g.cleanup(move || on_exit.borrow_mut().close());

        g.scenario("bad login", |_| -> Result<()> {
            check!(exchange(&sock, "nobody")? == "go away");
            Ok(())
        });

        g.scenario("good login", |g| -> Result<()> {
            check!(exchange(&sock, "fred flintstone")? == "hello");

            g.scenario("list files", |_| -> Result<()> {
                // no files yet, whichever leaf ran before
                check!(exchange(&sock, "ls")?.is_empty());
                Ok(())
            });

            g.scenario("upload file", |g| -> Result<()> {
                send(&sock, &format!("upload {FOX_CHAPTER_1}"))?;

                g.scenario("list files", |_| -> Result<()> {
                    check!(exchange(&sock, "ls")? == FOX_CHAPTER_1);
                    Ok(())
                });

                g.scenario("delete file", |g| -> Result<()> {
                    send(&sock, &format!("rm {FOX_CHAPTER_1}"))?;

                    g.scenario("list files", |_| -> Result<()> {
                        check!(exchange(&sock, "ls")?.is_empty());
                        Ok(())
                    });
                    Ok(())
                });

                g.scenario("upload another file", |g| -> Result<()> {
                    send(&sock, &format!("upload {FOX_CHAPTER_2}"))?;

                    g.scenario("list files", |_| -> Result<()> {
                        let listing = exchange(&sock, "ls")?;
                        let mut files: Vec<&str> = listing.split(',').collect();
                        files.sort_unstable();
                        let mut expected = vec![FOX_CHAPTER_1, FOX_CHAPTER_2];
                        expected.sort_unstable();
                        check!(files == expected, "listing was {listing:?}");
                        Ok(())
                    });
                    Ok(())
                });
                Ok(())
            });
            Ok(())
        });
    })
}
