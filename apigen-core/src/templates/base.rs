//! Shared artifacts: created once per project (or once per version) and
//! extended by every generated resource.

pub(super) const MODEL_BASE: &str = r#"<?php

namespace {{rootNamespace}}\Models;

use {{rootNamespace}}\Filters\QueryFilter;
use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\SoftDeletes;
use Illuminate\Contracts\Database\Eloquent\Builder;
use Illuminate\Database\Eloquent\Factories\HasFactory;

class ModelBase extends Model
{
    use SoftDeletes;
    use HasFactory;

    public function scopeFilter(Builder $builder, QueryFilter $filters): Builder
    {
        return $filters->apply($builder);
    }
}
"#;

pub(super) const QUERY_FILTER: &str = r#"<?php

namespace {{rootNamespace}}\Filters;

use Illuminate\Database\Eloquent\Builder;
use Illuminate\Http\Request;

abstract class QueryFilter
{
    protected Builder $builder;
    protected Request $request;
    protected array $sortable = [];

    public function __construct(Request $request)
    {
        $this->request = $request;
    }

    public function apply(Builder $builder): Builder
    {
        $this->builder = $builder;

        foreach ($this->request->all() as $key => $value) {
            if (method_exists($this, $key)) {
                $this->$key($value);
            }
        }

        return $builder;
    }

    protected function filter(array $arr): Builder
    {
        foreach ($arr as $key => $value) {
            if (method_exists($this, $key)) {
                $this->$key($value);
            }
        }

        return $this->builder;
    }

    protected function sort(string $value): void
    {
        $sortAttributes = explode(',', $value);

        foreach ($sortAttributes as $sortAttribute) {
            $direction = 'asc';

            if (strpos($sortAttribute, '-') === 0) {
                $direction = 'desc';
                $sortAttribute = substr($sortAttribute, 1);
            }

            if (!in_array($sortAttribute, $this->sortable) && !array_key_exists($sortAttribute, $this->sortable)) {
                continue;
            }

            $columnName = $this->sortable[$sortAttribute] ?? $sortAttribute;

            $this->builder->orderBy($columnName, $direction);
        }
    }
}
"#;

pub(super) const BASE_REPOSITORY_INTERFACE: &str = r#"<?php

namespace {{rootNamespace}}\Interfaces\{{version}};

use Illuminate\Database\Eloquent\Model;

interface BaseRepositoryInterface{{version}}
{
    public function all();
    public function find(Model $model);
    public function findBy(int $id);
    public function create(array $data);
    public function update(Model $model, array $data);
    public function delete(Model $model);
}
"#;

pub(super) const BASE_REPOSITORY: &str = r#"<?php

namespace {{rootNamespace}}\Repositories\{{version}};

use Illuminate\Database\Eloquent\Model;
use {{rootNamespace}}\Interfaces\{{version}}\BaseRepositoryInterface{{version}};

class BaseRepository{{version}} implements BaseRepositoryInterface{{version}}
{
    protected $model;
    protected $relations = [];

    public function __construct(Model $model, array $relations = [])
    {
        $this->model = $model;
        $this->relations = $relations;
    }

    public function all()
    {
        $query = $this->model->latest();
        if (!empty($this->relations)) {
            $query->with($this->relations);
        }
        return $query->get();
    }

    public function find(Model $model)
    {
        $query = $this->model->newQuery();
        if (!empty($this->relations)) {
            $query->with($this->relations);
        }
        return $query->find($model->getKey());
    }

    public function findBy(int $id)
    {
        return $this->model->find($id);
    }

    public function create(array $data)
    {
        return $this->model->create($data);
    }

    public function update(Model $model, array $data)
    {
        $model->fill($data);
        $model->save();
        return $model;
    }

    public function delete(Model $model)
    {
        return $model->delete();
    }
}
"#;

pub(super) const API_RENDERABLE_EXCEPTION: &str = r#"<?php

namespace {{rootNamespace}}\Interfaces\{{version}};

interface ApiRenderableException{{version}}
{
    public function getStatusCode(): int;
    public function getUserMessage(): string;
    public function getDeveloperHint(): ?string;
}
"#;

pub(super) const API_RESPONSES: &str = r#"<?php

namespace {{rootNamespace}}\Traits;

trait ApiResponses
{
    protected function ok($message, $data = [])
    {
        return $this->success($message, $data, 200);
    }

    protected function success($message, $data = [], $statusCode = 200)
    {
        return response()->json([
            'data' => $data,
            'message' => $message,
            'status' => $statusCode
        ], $statusCode);
    }

    protected function error($message, $statusCode)
    {
        return response()->json([
            'message' => $message,
            'status' => $statusCode
        ], $statusCode);
    }
}
"#;

pub(super) const API_CONTROLLER: &str = r#"<?php

namespace {{rootNamespace}}\Http\Controllers\Api\{{version}};

use {{rootNamespace}}\Http\Controllers\Controller;
use {{rootNamespace}}\Traits\ApiResponses;
use {{rootNamespace}}\Interfaces\{{version}}\ApiRenderableException{{version}};
use Illuminate\Support\Facades\Log;
use Throwable;

class ApiController{{version}} extends Controller
{
    use ApiResponses;

    public function include(string $relationship): bool
    {
        $param = request()->get('include');

        if (!isset($param)) {
            return false;
        }

        $includesValues = explode(',', strtolower($param));

        return in_array(strtolower($relationship), $includesValues);
    }

    protected function handleException(Throwable $e)
    {
        if ($e instanceof ApiRenderableException{{version}}) {
            Log::error(get_class($e) . ': ' . $e->getUserMessage(), [
                'developer_hint' => $e->getDeveloperHint(),
                'exception' => $e,
            ]);

            return response()->json([
                'message' => $e->getUserMessage(),
                'error_code' => $e->getStatusCode(),
            ], $e->getStatusCode());
        }

        Log::error('Unhandled Exception', ['exception' => $e]);

        return response()->json([
            'message' => 'An unexpected error occurred',
        ], 500);
    }
}
"#;
