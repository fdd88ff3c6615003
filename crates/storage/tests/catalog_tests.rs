#![cfg(feature = "postgres-tests")]

use sqlx::PgPool;

use pathplanner_domain::Term;
use pathplanner_storage::CatalogRepository;

async fn seed_course(pool: &PgPool, code: &str, credits: i32) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO courses (course_code, name, credits, semester, department)
         VALUES ($1, $2, $3, 'Fall 2025', 'CSCI')
         RETURNING id",
    )
    .bind(code)
    .bind(format!("{code} name"))
    .bind(credits)
    .fetch_one(pool)
    .await
}

#[sqlx::test(migrations = "../../migrations")]
async fn pathway_codes_union_flat_and_requirement_courses(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let intro = seed_course(&pool, "CSCI-1100", 4).await?;
    let ds = seed_course(&pool, "CSCI-1200", 4).await?;
    let elective = seed_course(&pool, "CSCI-4230", 3).await?;

    let pathway_id: i32 = sqlx::query_scalar(
        "INSERT INTO pathways (name, code, total_credits) VALUES ('Computer Science', 'CSCI', 128)
         RETURNING id",
    )
    .fetch_one(&pool)
    .await?;
    for course_id in [intro, ds] {
        sqlx::query("INSERT INTO pathway_courses (pathway_id, course_id) VALUES ($1, $2)")
            .bind(pathway_id)
            .bind(course_id)
            .execute(&pool)
            .await?;
    }
    let requirement_id: i32 = sqlx::query_scalar(
        "INSERT INTO pathway_requirements (pathway_id, name, credits_required)
         VALUES ($1, 'Technical Electives', 12)
         RETURNING id",
    )
    .bind(pathway_id)
    .fetch_one(&pool)
    .await?;
    // ds appears in both sets; the union must not duplicate it
    for course_id in [ds, elective] {
        sqlx::query("INSERT INTO requirement_courses (requirement_id, course_id) VALUES ($1, $2)")
            .bind(requirement_id)
            .bind(course_id)
            .execute(&pool)
            .await?;
    }

    let repo = CatalogRepository::new(pool);
    let pathway = repo.pathway_by_code("CSCI").await.unwrap().unwrap();
    assert_eq!(pathway.id, pathway_id);

    let codes = repo.pathway_course_codes(pathway_id).await.unwrap();
    assert_eq!(codes, vec!["CSCI-1100", "CSCI-1200", "CSCI-4230"]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn offerings_decode_terms_and_keep_null_years(pool: PgPool) -> Result<(), sqlx::Error> {
    let course_id = seed_course(&pool, "CSCI-1100", 4).await?;
    sqlx::query(
        "INSERT INTO course_offerings (course_id, term, year, section, days, start_time, end_time)
         VALUES ($1, 'Fall', 2025, '01', 'MWF', '09:00AM', '09:50AM'),
                ($1, 'Spring', NULL, '01', 'TR', '10:00AM', '11:15AM')",
    )
    .bind(course_id)
    .execute(&pool)
    .await?;

    let repo = CatalogRepository::new(pool);
    let offerings = repo.offerings_for_courses(&[course_id]).await.unwrap();

    assert_eq!(offerings.len(), 2);
    assert_eq!(offerings[0].term, Term::Fall);
    assert_eq!(offerings[0].year, Some(2025));
    assert_eq!(offerings[1].term, Term::Spring);
    assert_eq!(offerings[1].year, None);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn prerequisite_edges_round_trip(pool: PgPool) -> Result<(), sqlx::Error> {
    let a = seed_course(&pool, "CSCI-1100", 4).await?;
    let b = seed_course(&pool, "CSCI-1200", 4).await?;
    sqlx::query("INSERT INTO course_prerequisite (course_id, prerequisite_id) VALUES ($1, $2)")
        .bind(b)
        .bind(a)
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO course_corequisite (course_id, corequisite_id) VALUES ($1, $2)")
        .bind(a)
        .bind(b)
        .execute(&pool)
        .await?;

    let repo = CatalogRepository::new(pool);
    assert_eq!(repo.prerequisite_edges().await.unwrap(), vec![(b, a)]);
    assert_eq!(repo.corequisite_edges().await.unwrap(), vec![(a, b)]);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn stored_preferences_round_trip(pool: PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO student_preferences
            (user_id, max_credits_per_term, unavailable_days, avoid_mornings,
             preferred_instructors, earliest_start_time, preferred_time_of_day)
         VALUES (7, 12, 'F', TRUE, 'Goldschmidt,Turner', '09:00:00', 'afternoon')",
    )
    .execute(&pool)
    .await?;

    let repo = CatalogRepository::new(pool);
    let prefs = repo.preferences_for_user(7).await.unwrap().unwrap();
    assert_eq!(prefs.max_credits_per_term, Some(12));
    assert_eq!(prefs.unavailable_days.as_deref(), Some("F"));
    assert!(prefs.avoid_mornings);
    assert!(!prefs.avoid_evenings);
    assert_eq!(
        prefs.preferred_instructors.as_deref(),
        Some("Goldschmidt,Turner")
    );
    assert_eq!(prefs.preferred_time_of_day.as_deref(), Some("afternoon"));

    assert!(repo.preferences_for_user(8).await.unwrap().is_none());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn average_rating_is_mean_of_per_course_averages(pool: PgPool) -> Result<(), sqlx::Error> {
    let a = seed_course(&pool, "CSCI-1100", 4).await?;
    let b = seed_course(&pool, "CSCI-1200", 4).await?;
    let unrated = seed_course(&pool, "CSCI-2300", 4).await?;

    for (course_id, rating) in [(a, 4.0), (a, 2.0), (b, 5.0)] {
        sqlx::query("INSERT INTO course_reviews (course_id, rating) VALUES ($1, $2)")
            .bind(course_id)
            .bind(rating)
            .execute(&pool)
            .await?;
    }

    let repo = CatalogRepository::new(pool);
    // course a averages 3.0, course b 5.0; unrated courses are excluded
    let avg = repo.average_rating(&[a, b, unrated]).await.unwrap().unwrap();
    assert!((avg - 4.0).abs() < 1e-9);

    assert!(repo.average_rating(&[unrated]).await.unwrap().is_none());

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn bump_enrolled_skips_null_counters(pool: PgPool) -> Result<(), sqlx::Error> {
    let course_id = seed_course(&pool, "CSCI-1100", 4).await?;
    let counted: i32 = sqlx::query_scalar(
        "INSERT INTO course_offerings (course_id, term, enrolled) VALUES ($1, 'Fall', 3)
         RETURNING id",
    )
    .bind(course_id)
    .fetch_one(&pool)
    .await?;
    let uncounted: i32 = sqlx::query_scalar(
        "INSERT INTO course_offerings (course_id, term) VALUES ($1, 'Fall')
         RETURNING id",
    )
    .bind(course_id)
    .fetch_one(&pool)
    .await?;

    let repo = CatalogRepository::new(pool.clone());
    repo.bump_enrolled(counted).await.unwrap();
    repo.bump_enrolled(uncounted).await.unwrap();

    let enrolled: Option<i32> =
        sqlx::query_scalar("SELECT enrolled FROM course_offerings WHERE id = $1")
            .bind(counted)
            .fetch_one(&pool)
            .await?;
    assert_eq!(enrolled, Some(4));

    let still_null: Option<i32> =
        sqlx::query_scalar("SELECT enrolled FROM course_offerings WHERE id = $1")
            .bind(uncounted)
            .fetch_one(&pool)
            .await?;
    assert_eq!(still_null, None);

    Ok(())
}
