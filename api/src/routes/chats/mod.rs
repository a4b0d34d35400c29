pub mod chat_types;
pub mod chats_route;
