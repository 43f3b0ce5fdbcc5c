// Copyright (c) 2025 Templated SQL LSP Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Raw/Compiled Text Fixtures
//!
//! Each pair is a raw templated model and the SQL it compiles to. The
//! pairs are constructed so the line diff between them has a known run
//! structure; the mapping tests pin exact line pairs against them.

/// Config block at the top of the file, compiled away entirely.
pub const CONFIG_AT_THE_BEGINNING_RAW: &str = "\
{{
  config(
    materialized='table',
    schema='reporting',
    tags=['daily']
  )
}}
select customers.customer_id,
       customers.first_name,
       customers.email,
       customers.last_name,
       orders.order_count,
       orders.last_order_at,
       orders.lifetime_value
from customers
left join (
    select customer_id,
           count(*) as order_count,
           max(ordered_at) as last_order_at,
           sum(amount) as lifetime_value
    from orders
    group by customer_id
) as orders
    on customers.customer_id = orders.customer_id
";

pub const CONFIG_AT_THE_BEGINNING_COMPILED: &str = "\
select customers.customer_id,
       customers.first_name,
       customers.email,
       customers.last_name,
       orders.order_count,
       orders.last_order_at,
       orders.lifetime_value
from customers
left join (
    select customer_id,
           count(*) as order_count,
           max(ordered_at) as last_order_at,
           sum(amount) as lifetime_value
    from orders
    group by customer_id
) as orders
    on customers.customer_id = orders.customer_id
";

/// Template comments after the query, dropped by compilation.
pub const JINJA_AT_THE_END_RAW: &str = "\
select event_id,
       event_type,
       user_id,
       occurred_at
from events
where occurred_at >= '2024-01-01'
  and event_type != 'heartbeat'
order by occurred_at
limit 1000
{# cleaned up by the events pipeline #}
{# do not edit the filters above #}
";

pub const JINJA_AT_THE_END_COMPILED: &str = "\
select event_id,
       event_type,
       user_id,
       occurred_at
from events
where occurred_at >= '2024-01-01'
  and event_type != 'heartbeat'
order by occurred_at
limit 1000
";

/// A for-loop expansion plus a macro call that inserts a block of lines.
pub const LOOP_RAW: &str = "\
{{
  config(
    materialized='incremental',
    unique_key='order_id',
    incremental_strategy='merge',
    partition_by={'field': 'ordered_at', 'data_type': 'timestamp'}
  )
}}
with orders as (
    select order_id,
           customer_id,
           ordered_at,
           payment_method,
    {% for method in ['credit_card', 'coupon'] %}
    sum(case when payment_method = '{{ method }}' then amount end) as {{ method }}_amount,
    {% endfor %}
           amount
    from raw_orders
),
payment_totals as (
    select orders.order_id,
           count(payment_method) as method_count,
    {{ payment_day_parts('ordered_at') }}
           sum(amount) as total_amount
    from orders
    group by order_id
)
";

pub const LOOP_COMPILED: &str = "\
with orders as (
    select order_id,
           customer_id,
           ordered_at,
           payment_method,
    sum(case when payment_method = 'credit_card' then amount end) as credit_card_amount,
    sum(case when payment_method = 'coupon' then amount end) as coupon_amount,
           amount
    from raw_orders
),
payment_totals as (
    select orders.order_id,
           count(payment_method) as method_count,
           sum(case when extract(hour from ordered_at) between 0 and 5 then amount end) as overnight_amount,
           sum(case when extract(hour from ordered_at) between 6 and 11 then amount end) as morning_amount,
           sum(case when extract(hour from ordered_at) between 12 and 17 then amount end) as afternoon_amount,
           sum(case when extract(hour from ordered_at) between 18 and 23 then amount end) as evening_amount,
           count(case when extract(hour from ordered_at) between 0 and 5 then order_id end) as overnight_orders,
           count(case when extract(hour from ordered_at) between 6 and 11 then order_id end) as morning_orders,
           count(case when extract(hour from ordered_at) between 12 and 17 then order_id end) as afternoon_orders,
           count(case when extract(hour from ordered_at) between 18 and 23 then order_id end) as evening_orders,
           min(ordered_at) as first_ordered_at,
           max(ordered_at) as last_ordered_at,
           avg(amount) as avg_amount,
           min(amount) as min_amount,
           max(amount) as max_amount,
           sum(amount) as total_amount
    from orders
    group by order_id
)
";

/// One inline ref expanded to a fully qualified relation.
pub const ONE_REF_RAW: &str = "\
{{
  config(
    materialized='view'
  )
}}
select payment_id,
       amount
from {{ ref('stg_payments') }}
where amount > 0
order by payment_id
limit 100
";

pub const ONE_REF_COMPILED: &str = "\
select payment_id,
       amount
from analytics.jaffle_shop.stg_payments
where amount > 0
order by payment_id
limit 100
";

/// Two refs, the second of which expands to more lines than it replaces.
pub const MULTIPLE_REF_RAW: &str = "\
select customers.customer_id from (
    select * from {{ ref('stg_customers') }}
) as customers
left join (
    select * from {{ ref('all_payments') }}
) as payments
    on customers.customer_id = payments.customer_id
";

pub const MULTIPLE_REF_COMPILED: &str = "\
select customers.customer_id from (
    select * from analytics.jaffle_shop.stg_customers
) as customers
left join (
    select * from analytics.jaffle_shop.payments_2023
    union all
    select * from analytics.jaffle_shop.payments_2024
) as payments
    on customers.customer_id = payments.customer_id
";
