//! Records every store starts out with when constructed through [`Store::seeded`].
//!
//! [`Store::seeded`]: crate::store::Store::seeded

use postboard_common::model::{Id, post::Post, user::User};

#[must_use]
pub fn users() -> Vec<User> {
    [
        (1, "Leanne Graham", "Bret", "Sincere@april.biz"),
        (2, "Ervin Howell", "Antonette", "Shanna@melissa.tv"),
    ]
    .into_iter()
    .map(|(id, name, username, email)| User {
        id: Id::new(id),
        name: name.to_owned(),
        username: username.to_owned(),
        email: email.to_owned(),
    })
    .collect()
}

#[must_use]
pub fn posts() -> Vec<Post> {
    [
        (
            1,
            1,
            "sunt aut facere repellat provident occaecati excepturi optio reprehenderit",
            "quia et suscipit\nsuscipit recusandae consequuntur expedita et cum\n\
            reprehenderit molestiae ut ut quas totam\nnostrum rerum est autem sunt rem eveniet \
            architecto",
        ),
        (
            2,
            1,
            "qui est esse",
            "est rerum tempore vitae\nsequi sint nihil reprehenderit dolor beatae ea dolores \
            neque\nfugiat blanditiis voluptate porro vel nihil molestiae ut reiciendis\nqui \
            aperiam non debitis possimus qui neque nisi nulla",
        ),
        (
            3,
            2,
            "ea molestias quasi exercitationem repellat qui ipsa sit aut",
            "et iusto sed quo iure\nvoluptatem occaecati omnis eligendi aut ad\nvoluptatem \
            doloribus vel accusantium quis pariatur\nmolestiae porro eius odio et labore et \
            velit aut",
        ),
        (
            4,
            2,
            "eum et est occaecati",
            "ullam et saepe reiciendis voluptatem adipisci\nsit amet autem assumenda provident \
            rerum culpa\nquis hic commodi nesciunt rem tenetur doloremque ipsam iure\nquis sunt \
            voluptatem rerum illo velit",
        ),
        (
            5,
            1,
            "nesciunt quas odio",
            "repudiandae veniam quaerat sunt sed\nalias aut fugiat sit autem sed est\nvoluptatem \
            omnis possimus esse voluptatibus quis\nest aut tenetur dolor neque",
        ),
    ]
    .into_iter()
    .map(|(id, user_id, title, body)| Post {
        id: Id::new(id),
        user_id: Id::new(user_id),
        title: title.to_owned(),
        body: body.to_owned(),
    })
    .collect()
}
