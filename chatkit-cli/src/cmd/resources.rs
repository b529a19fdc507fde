//! Resource commands: each runs one blocking call and prints the JSON result.

use chatkit::{
    BlockingBackend, ChatKit, Direction, ListRoomsOptions, ListUsersOptions, NewMessage, NewRoom,
    NewUser, RoomMessagesOptions,
};
use serde_json::Value;

use super::{CursorCommand, MessageCommand, RoleCommand, RoomCommand, UserCommand};

type Kit = ChatKit<BlockingBackend>;

/// Pretty-print a result; a JSON `null` prints nothing.
pub fn print_json(value: &Value) -> chatkit::Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| chatkit::Error::Configuration(format!("render: {e}")))?;
    println!("{text}");
    Ok(())
}

pub fn user(kit: &Kit, cmd: UserCommand) -> chatkit::Result<Value> {
    match cmd {
        UserCommand::Get { id } => kit.get_user(&id),
        UserCommand::List { from_ts, limit } => {
            kit.get_users(&ListUsersOptions { from_ts, limit })
        }
        UserCommand::Create {
            id,
            name,
            avatar_url,
        } => kit.create_user(&NewUser {
            avatar_url,
            ..NewUser::new(id, name)
        }),
        UserCommand::Delete { id } => kit.delete_user(&id),
    }
}

pub fn room(kit: &Kit, cmd: RoomCommand) -> chatkit::Result<Value> {
    match cmd {
        RoomCommand::Get { id } => kit.get_room(&id),
        RoomCommand::List {
            from_id,
            include_private,
        } => kit.get_rooms(&ListRoomsOptions {
            from_id,
            include_private,
        }),
        RoomCommand::Create {
            name,
            creator,
            private,
            members,
        } => kit.create_room(
            &creator,
            &NewRoom {
                private,
                user_ids: members,
                ..NewRoom::new(name)
            },
        ),
        RoomCommand::Delete { id } => kit.delete_room(&id),
    }
}

pub fn message(kit: &Kit, cmd: MessageCommand) -> chatkit::Result<Value> {
    match cmd {
        MessageCommand::Send { room, text, sender } => kit.send_message(
            &room,
            &NewMessage {
                sender_id: sender,
                text,
                attachment: None,
            },
        ),
        MessageCommand::List {
            room,
            limit,
            initial_id,
            newer,
        } => kit.get_room_messages(
            &room,
            &RoomMessagesOptions {
                initial_id,
                limit,
                direction: newer.then_some(Direction::Newer),
            },
        ),
    }
}

pub fn role(kit: &Kit, cmd: RoleCommand) -> chatkit::Result<Value> {
    match cmd {
        RoleCommand::List => kit.list_all_roles(),
        RoleCommand::User { id } => kit.list_user_roles(&id),
    }
}

pub fn cursor(kit: &Kit, cmd: CursorCommand) -> chatkit::Result<Value> {
    match cmd {
        CursorCommand::Get { user, room } => kit.get_read_cursor(&user, &room),
        CursorCommand::Set {
            user,
            room,
            position,
        } => kit.set_read_cursor(&user, &room, position),
    }
}
