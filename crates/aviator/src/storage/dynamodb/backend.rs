//! DynamoDB backend implementation.
//!
//! Implements [`KvBackend`] on one DynamoDB table with `aws-sdk-dynamodb`.
//! Each trait method issues exactly one request; the SDK client is built with
//! retries disabled so failures surface to the caller unchanged.

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::types::{
    DeleteRequest, Put, PutRequest, TransactWriteItem, WriteRequest as SdkWriteRequest,
};
use aws_sdk_dynamodb::Client;

use aviator_core::storage::{
    render_key_condition, Condition, Item, Key, KvBackend, Placeholders, QueryInput, QueryPage,
    Result, UpdateExpression, WriteRequest,
};

use super::conversions::{
    from_attribute_map, key_from_attribute_map, key_to_attribute_map, to_attribute_map,
};
use super::error::{
    map_batch_write_error, map_build_error, map_delete_item_error, map_get_item_error,
    map_put_item_error, map_query_error, map_transact_write_error, map_update_item_error,
};
use crate::config::Config;

/// DynamoDB-based backend.
#[derive(Debug, Clone)]
pub struct DynamoDbBackend {
    client: Client,
    table_name: String,
}

impl DynamoDbBackend {
    /// Creates a backend with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a backend from application configuration.
    ///
    /// Uses the AWS SDK default credential chain, the configured region and
    /// optional endpoint (e.g. DynamoDB Local), with SDK retries disabled.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint) = &config.aws_endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn to_sdk_write_request(request: WriteRequest) -> Result<SdkWriteRequest> {
    let request = match request {
        WriteRequest::Put(item) => {
            let put = PutRequest::builder()
                .set_item(Some(to_attribute_map(item)))
                .build()
                .map_err(map_build_error)?;
            SdkWriteRequest::builder().set_put_request(Some(put)).build()
        }
        WriteRequest::Delete(key) => {
            let delete = DeleteRequest::builder()
                .set_key(Some(key_to_attribute_map(&key)))
                .build()
                .map_err(map_build_error)?;
            SdkWriteRequest::builder()
                .set_delete_request(Some(delete))
                .build()
        }
    };
    Ok(request)
}

fn from_sdk_write_request(request: SdkWriteRequest) -> Result<Option<WriteRequest>> {
    if let Some(put) = request.put_request {
        return Ok(Some(WriteRequest::Put(from_attribute_map(put.item)?)));
    }
    if let Some(delete) = request.delete_request {
        return Ok(Some(WriteRequest::Delete(key_from_attribute_map(
            delete.key,
        )?)));
    }
    Ok(None)
}

#[async_trait]
impl KvBackend for DynamoDbBackend {
    async fn put_item(&self, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_attribute_map(item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn get_item(&self, key: &Key) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attribute_map(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.map(from_attribute_map).transpose()
    }

    async fn update_item(
        &self,
        key: &Key,
        update: &UpdateExpression,
        condition: Option<&Condition>,
    ) -> Result<()> {
        let mut placeholders = Placeholders::new();
        let update_expression = update.render(&mut placeholders);
        let condition_expression = condition.map(|c| c.render(&mut placeholders));
        let (names, values) = placeholders.into_parts();

        self.client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attribute_map(key)))
            .update_expression(update_expression)
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(to_attribute_map(values)))
            .send()
            .await
            .map_err(map_update_item_error)?;

        Ok(())
    }

    async fn query(&self, input: &QueryInput) -> Result<QueryPage> {
        let mut placeholders = Placeholders::new();
        let key_condition = render_key_condition(
            input.partition_attribute(),
            &input.partition,
            input.sort_attribute(),
            input.sort.as_ref(),
            &mut placeholders,
        );
        let filter_expression = input.filter.as_ref().map(|f| f.render(&mut placeholders));
        let (names, values) = placeholders.into_parts();

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .set_index_name(input.index.map(|index| index.name().to_string()))
            .key_condition_expression(key_condition)
            .set_filter_expression(filter_expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(to_attribute_map(values)))
            .set_limit(input.limit)
            .set_exclusive_start_key(input.exclusive_start_key.clone().map(to_attribute_map))
            .scan_index_forward(input.direction.is_forward())
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result
            .items
            .unwrap_or_default()
            .into_iter()
            .map(from_attribute_map)
            .collect::<Result<Vec<_>>>()?;
        let last_evaluated_key = result
            .last_evaluated_key
            .map(from_attribute_map)
            .transpose()?;

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn delete_item(&self, key: &Key) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_to_attribute_map(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> Result<Vec<WriteRequest>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let requests = requests
            .into_iter()
            .map(to_sdk_write_request)
            .collect::<Result<Vec<_>>>()?;

        let result = self
            .client
            .batch_write_item()
            .request_items(&self.table_name, requests)
            .send()
            .await
            .map_err(map_batch_write_error)?;

        let mut unprocessed = Vec::new();
        if let Some(unprocessed_items) = result.unprocessed_items {
            for requests in unprocessed_items.into_values() {
                for request in requests {
                    unprocessed.extend(from_sdk_write_request(request)?);
                }
            }
        }

        Ok(unprocessed)
    }

    async fn transact_write(&self, items: Vec<Item>) -> Result<()> {
        let transact_items = items
            .into_iter()
            .map(|item| {
                Put::builder()
                    .table_name(&self.table_name)
                    .set_item(Some(to_attribute_map(item)))
                    .build()
                    .map(|put| TransactWriteItem::builder().put(put).build())
                    .map_err(map_build_error)
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .transact_write_items()
            .set_transact_items(Some(transact_items))
            .send()
            .await
            .map_err(map_transact_write_error)?;

        Ok(())
    }
}
