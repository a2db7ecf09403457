use std_util::prelude::*;
use tests::{models, tests, DbTest};
use tether::{driver::Operation, record, Model};

use tests::models::{Automaker, Car, Post, User};

async fn rows_inserted_directly_are_members(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Han" }).await.unwrap();
    let first: Post = db
        .create(record! { "title" => "one", "user_id" => user.id() })
        .await
        .unwrap();
    let second: Post = db
        .create(record! { "title" => "two", "user_id" => user.id() })
        .await
        .unwrap();

    assert_eq!(user.posts(&db).unwrap().count().await.unwrap(), 2);

    let ids = user.posts(&db).unwrap().ids().await.unwrap();
    assert!(ids.contains(&first.id().unwrap()));
    assert!(ids.contains(&second.id().unwrap()));
}

async fn created_member_visible_without_requery(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Leia" }).await.unwrap();
    test.log().clear();

    let post = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "Alderaan" })
        .await
        .unwrap()
        .clone();
    assert!(post.record().is_persisted());

    let members = user.posts(&db).unwrap().reader().await.unwrap();
    assert_eq!(members, [post]);

    // One read to load the empty collection, then only the insert
    assert_eq!(test.log().names(), ["find_many", "insert"]);
}

async fn assigning_nothing_clears_target(test: &mut DbTest) {
    let db = test.setup_db(models!(Automaker, Car)).await;

    let automaker: Automaker = db.create(record! { "name" => "Saab" }).await.unwrap();
    let mut car: Car = db
        .create(record! { "name" => "900", "automaker_id" => automaker.id() })
        .await
        .unwrap();
    assert!(car.automaker(&db).unwrap().reader().await.unwrap().is_some());

    car.automaker(&db).unwrap().writer(None);

    assert_none!(car.automaker(&db).unwrap().reader().await.unwrap());
    assert_none!(car.automaker_id());
}

async fn clear_keeps_rows(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Lando" }).await.unwrap();
    for title in ["Cloud City", "Falcon"] {
        user.posts(&db)
            .unwrap()
            .create(record! { "title" => title })
            .await
            .unwrap();
    }
    let ids = user.posts(&db).unwrap().ids().await.unwrap();

    user.posts(&db).unwrap().clear().await.unwrap();
    assert_eq!(user.posts(&db).unwrap().count().await.unwrap(), 0);

    for id in ids {
        let post: Post = db.get(id).await.unwrap();
        assert_none!(post.user_id());
    }
}

async fn writer_then_reader(test: &mut DbTest) {
    let db = test.setup_db(models!(Automaker, Car)).await;

    let first: Automaker = db.create(record! { "name" => "Audi" }).await.unwrap();
    let second: Automaker = db.create(record! { "name" => "BMW" }).await.unwrap();
    let mut car: Car = db.create(record! { "name" => "A4" }).await.unwrap();

    for target in [&first, &second] {
        car.automaker(&db).unwrap().writer(Some(target));

        assert_eq!(
            car.automaker(&db).unwrap().reader().await.unwrap(),
            Some(target)
        );
        assert_eq!(car.automaker_id(), target.id());
    }

    // An unsaved target has no id to point at
    let unsaved = Automaker::new(record! { "name" => "Nobody" });
    car.automaker(&db).unwrap().writer(Some(&unsaved));
    assert_none!(car.automaker_id());
}

async fn append_twice_keeps_count(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Chewie" }).await.unwrap();
    let mut post: Post = db.create(record! { "title" => "Rrraugh" }).await.unwrap();

    user.posts(&db).unwrap().append(&mut post).await.unwrap();
    assert_eq!(user.posts(&db).unwrap().count().await.unwrap(), 1);

    user.posts(&db).unwrap().append(&mut post).await.unwrap();
    assert_eq!(user.posts(&db).unwrap().count().await.unwrap(), 1);
}

async fn replace_sets_ids_and_nulls_removed(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Wedge" }).await.unwrap();
    let mut old = Vec::new();
    for title in ["a", "b"] {
        let post = user
            .posts(&db)
            .unwrap()
            .create(record! { "title" => title })
            .await
            .unwrap()
            .clone();
        old.push(post);
    }
    let kept = old[1].clone();
    let fresh: Post = db.create(record! { "title" => "c" }).await.unwrap();

    user.posts(&db)
        .unwrap()
        .replace(vec![kept.clone(), fresh.clone()])
        .await
        .unwrap();

    let mut ids = user.posts(&db).unwrap().ids().await.unwrap();
    ids.sort();
    let mut expected = vec![kept.id().unwrap(), fresh.id().unwrap()];
    expected.sort();
    assert_eq!(ids, expected);

    let removed: Post = db.get(old[0].id().unwrap()).await.unwrap();
    assert_none!(removed.user_id());

    let mut stored = db.find_by::<Post>("user_id", user.id()).await.unwrap();
    stored.sort_by_key(|post| post.id());
    assert_eq!(stored.len(), 2);
}

async fn delete_keeps_row_destroy_removes_it(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Biggs" }).await.unwrap();
    let mut kept = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "kept" })
        .await
        .unwrap()
        .clone();
    let mut gone = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "gone" })
        .await
        .unwrap()
        .clone();

    user.posts(&db).unwrap().delete(&mut kept).await.unwrap();
    user.posts(&db).unwrap().destroy(&mut gone).await.unwrap();

    let stored: Post = db.get(kept.id().unwrap()).await.unwrap();
    assert_none!(stored.user_id());
    assert_none!(kept.user_id());

    assert_err!(
        db.get::<Post>(gone.id().unwrap()).await,
        tether::Error::is_record_not_found
    );
    assert_empty!(user.posts(&db).unwrap().reader().await.unwrap());
}

async fn build_then_persist_matches_create(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Obi-Wan" }).await.unwrap();

    let built = user
        .posts(&db)
        .unwrap()
        .build(record! { "title" => "built" })
        .await
        .unwrap();
    db.save(&mut *built).await.unwrap();
    let built = built.clone();

    let created = user
        .posts(&db)
        .unwrap()
        .create(record! { "title" => "created" })
        .await
        .unwrap()
        .clone();

    // The owner that built the post sees it saved
    assert_eq!(
        user.posts(&db).unwrap().ids().await.unwrap(),
        [built.id().unwrap(), created.id().unwrap()]
    );

    // From a fresh owner both read back the same way
    let mut fresh: User = db.get(user.id().unwrap()).await.unwrap();
    let members = fresh.posts(&db).unwrap().reader().await.unwrap();

    assert_eq!(members, [built.clone(), created.clone()]);
    assert_eq!(built.user_id(), user.id());
    assert_eq!(created.user_id(), user.id());

    // And the belongs-to side agrees
    let mut post: Post = db.get(built.id().unwrap()).await.unwrap();
    assert_eq!(post.user(&db).unwrap().reader().await.unwrap(), Some(&user));
}

async fn cached_reads_issue_no_queries(test: &mut DbTest) {
    let db = test.setup_db(models!(User, Post)).await;

    let mut user: User = db.create(record! { "first_name" => "Yoda" }).await.unwrap();
    db.create::<Post>(record! { "title" => "Do or do not", "user_id" => user.id() })
        .await
        .unwrap();
    test.log().clear();

    user.posts(&db).unwrap().count().await.unwrap();
    assert!(user.posts_loaded());
    assert_eq!(
        test.log().count(|op| matches!(op, Operation::FindMany(_))),
        1
    );

    user.posts(&db).unwrap().reader().await.unwrap();
    user.posts(&db).unwrap().ids().await.unwrap();
    assert_eq!(test.log().len(), 1);

    user.posts(&db).unwrap().reload().await.unwrap();
    assert_eq!(test.log().len(), 2);
}

tests!(
    rows_inserted_directly_are_members,
    created_member_visible_without_requery,
    assigning_nothing_clears_target,
    clear_keeps_rows,
    writer_then_reader,
    append_twice_keeps_count,
    replace_sets_ids_and_nulls_removed,
    delete_keeps_row_destroy_removes_it,
    build_then_persist_matches_create,
    cached_reads_issue_no_queries,
);
