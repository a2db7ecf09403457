use std_util::prelude::*;
use tests::{models, tests, DbTest};
use tether::{record, Error, Model};

use tests::models::{Author, Automaker, Car, Draft, Post, User};

async fn failed_append_changes_nothing(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Kylo" }).await.unwrap();
    let existing = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "Mask" })
        .await
        .unwrap()
        .clone();
    let mut post: Post = db.create(record! { "title" => "Saber" }).await.unwrap();

    test.faults().fail_next("update_by_key", "hm_posts");
    assert_err!(
        user.posts(&db).unwrap().append(&mut post).await,
        Error::is_persistence_failure
    );

    assert!(test.faults().is_empty());
    assert_none!(post.user_id());
    assert_eq!(user.cached_posts(), Some(&[existing.clone()][..]));

    // A retry goes through
    user.posts(&db).unwrap().append(&mut post).await.unwrap();
    assert_eq!(post.user_id(), user.id());
    assert_eq!(user.posts(&db).unwrap().count().await.unwrap(), 2);
}

async fn failed_create_adds_no_member(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Hux" }).await.unwrap();
    user.posts(&db).unwrap().reader().await.unwrap();

    test.faults().fail_next("insert", "hm_posts");
    assert_err!(
        user.posts(&db)
            .unwrap()
            .create(record! { "title" => "Order" })
            .await,
        Error::is_persistence_failure
    );

    assert_eq!(user.cached_posts(), Some(&[][..]));
    assert_empty!(db.find_by::<Post>("user_id", user.id()).await.unwrap());
}

async fn failed_delete_keeps_member(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Phasma" }).await.unwrap();
    let mut post = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "Chrome" })
        .await
        .unwrap()
        .clone();

    test.faults().fail_next("update_by_key", "hm_posts");
    assert_err!(
        user.posts(&db).unwrap().delete(&mut post).await,
        Error::is_persistence_failure
    );
    assert_eq!(post.user_id(), user.id());
    assert!(user.posts(&db).unwrap().include(&post).await.unwrap());
}

async fn failed_destroy_keeps_member(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Rey" }).await.unwrap();
    let mut post = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "Jakku" })
        .await
        .unwrap()
        .clone();

    test.faults().fail_next("delete_by_key", "hm_posts");
    assert_err!(
        user.posts(&db).unwrap().destroy(&mut post).await,
        Error::is_persistence_failure
    );

    assert!(!post.record().is_destroyed());
    assert_eq!(user.cached_posts(), Some(&[post.clone()][..]));
    assert_some!(db.find::<Post>(post.id().unwrap()).await.unwrap());

    user.posts(&db).unwrap().destroy(&mut post).await.unwrap();
    assert!(post.record().is_destroyed());
    assert!(user.posts(&db).unwrap().is_empty().await.unwrap());
}

async fn failed_replace_keeps_cache(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Snoke" }).await.unwrap();
    let post = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "Throne" })
        .await
        .unwrap()
        .clone();

    test.faults().fail_next("update_by_key", "hm_posts");
    assert_err!(
        user.posts(&db).unwrap().clear().await,
        Error::is_persistence_failure
    );

    assert_eq!(user.cached_posts(), Some(&[post][..]));
}

async fn failed_clear_keeps_cache(test: &mut DbTest) {
    let db = test.setup_db(models!(Author, Draft)).await;

    let mut author: Author = db.create(record! { "name" => "Octavia" }).await.unwrap();
    let draft = author
        .drafts(&db)
        .unwrap()
        .create(record! { "title" => "Kindred" })
        .await
        .unwrap()
        .clone();

    test.faults().fail_next("delete_by_key", "drafts");
    assert_err!(
        author.drafts(&db).unwrap().clear().await,
        Error::is_persistence_failure
    );

    assert_eq!(author.cached_drafts(), Some(&[draft.clone()][..]));
    assert_some!(db.find::<Draft>(draft.id().unwrap()).await.unwrap());
}

async fn failed_ids_writer_keeps_cache(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Leia" }).await.unwrap();
    let kept = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "Alderaan" })
        .await
        .unwrap()
        .clone();
    let other: Post = db.create(record! { "title" => "Hoth" }).await.unwrap();

    // The first write nulls `kept`; it fails before `other` is touched
    test.faults().fail_next("update_by_key", "hm_posts");
    assert_err!(
        user.posts(&db)
            .unwrap()
            .ids_writer(&[other.id().unwrap()])
            .await,
        Error::is_persistence_failure
    );

    assert_eq!(user.cached_posts(), Some(&[kept.clone()][..]));
    let stored: Post = db.get(other.id().unwrap()).await.unwrap();
    assert_none!(stored.user_id());
}

async fn failed_belongs_to_create_keeps_owner(test: &mut DbTest) {
    let db = test.setup_db(models!(Automaker, Car)).await;

    let ford: Automaker = db.create(record! { "name" => "Ford" }).await.unwrap();
    let mut car: Car = db
        .create(record! { "name" => "Bronco", "automaker_id" => ford.id() })
        .await
        .unwrap();
    car.automaker(&db).unwrap().reader().await.unwrap();

    test.faults().fail_next("insert", "bt_automakers");
    assert_err!(
        car.automaker(&db)
            .unwrap()
            .create(record! { "name" => "Lincoln" })
            .await,
        Error::is_persistence_failure
    );

    assert_eq!(car.automaker_id(), ford.id());
    assert_eq!(car.cached_automaker(), Some(&ford));
}

async fn failed_load_is_retried(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Maz" }).await.unwrap();
    db.create::<Post>(record! { "title" => "Castle", "user_id" => user.id() })
        .await
        .unwrap();

    test.faults().fail_next("find_many", "hm_posts");
    assert_err!(
        user.posts(&db).unwrap().reader().await,
        Error::is_persistence_failure
    );
    assert!(!user.posts_loaded());

    assert_eq!(user.posts(&db).unwrap().count().await.unwrap(), 1);
    assert!(user.posts_loaded());
}

tests!(
    failed_append_changes_nothing,
    failed_create_adds_no_member,
    failed_delete_keeps_member,
    failed_destroy_keeps_member,
    failed_replace_keeps_cache,
    failed_clear_keeps_cache,
    failed_ids_writer_keeps_cache,
    failed_belongs_to_create_keeps_owner,
    failed_load_is_retried,
);
